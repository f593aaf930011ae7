use std::fmt;

use serde::Serialize;

use crate::world::Agent;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub health: f32,
    pub energy: f32,
    pub coins: u32,
    pub food: u32,
    pub intel: f32,
    pub performance: f32,
    pub deaths: u32,
    pub intent: String,
    pub status: String,
}

impl fmt::Display for LeaderboardRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>2}. {:<10} P:{:>6.1} H:{:>3.0} E:{:>3.0} C:{:>3} F:{} I:{:>5.1} D:{:>2} {}",
            self.rank,
            self.name,
            self.performance,
            self.health,
            self.energy,
            self.coins,
            self.food,
            self.intel,
            self.deaths,
            self.intent,
        )?;
        if !self.status.is_empty() {
            write!(f, " [{}]", self.status)?;
        }
        Ok(())
    }
}

/// Agents ranked by performance, best first. Ties keep agent order.
pub fn leaderboard(agents: &[Agent]) -> Vec<LeaderboardRow> {
    let mut ranked: Vec<&Agent> = agents.iter().collect();
    ranked.sort_by(|a, b| b.performance.total_cmp(&a.performance));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, a)| LeaderboardRow {
            rank: i + 1,
            name: a.name.clone(),
            health: a.health,
            energy: a.energy,
            coins: a.coins,
            food: a.food,
            intel: a.intel,
            performance: a.performance,
            deaths: a.deaths,
            intent: if a.intent.is_empty() {
                "-".to_string()
            } else {
                a.intent.clone()
            },
            status: a.status.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn ranks_by_performance_with_stable_ties() {
        let mut agents: Vec<Agent> = ["a", "b", "c"]
            .iter()
            .map(|n| Agent::new(*n, Vec2::ZERO))
            .collect();
        agents[1].performance = 2.0;
        agents[2].intent = "seek_coin".into();

        let rows = leaderboard(&agents);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].intent, "-");
        assert_eq!(rows[2].intent, "seek_coin");
        assert!(rows[0].to_string().starts_with(" 1. b"));
    }
}
