//! Distribution planning for load-balance commands.

use wave_models::{BalanceStrategy, CommandContext, LoadBalanceOperation};
use wave_parser::MAX_TASKS_PER_TEAM;

/// `current_state` key holding per-team capacities.
pub const TEAM_CAPACITY_KEY: &str = "team_capacity";

/// `current_state` key holding per-team priority weights.
pub const TEAM_PRIORITY_KEY: &str = "team_priority";

/// Which tasks go to which team.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributionPlan {
    /// Tasks per team, in the order the teams were listed.
    pub assignments: Vec<(String, Vec<String>)>,
    /// Tasks left over once every team hit its cap.
    pub unassigned: Vec<String>,
}

impl DistributionPlan {
    /// Number of tasks given to some team.
    pub fn assigned_count(&self) -> usize {
        self.assignments.iter().map(|(_, tasks)| tasks.len()).sum()
    }
}

/// Spreads the context's available tasks (sorted) across the listed teams.
///
/// `round_robin` cycles through the teams. The weighted strategies give
/// each task to the team with the lowest load/weight ratio, reading
/// weights from `current_state` (missing or non-positive weights count as
/// 1). Ties go to the team listed first.
pub fn plan_distribution(op: &LoadBalanceOperation, context: &CommandContext) -> DistributionPlan {
    let mut plan = DistributionPlan {
        assignments: op.teams.iter().map(|t| (t.clone(), Vec::new())).collect(),
        unassigned: Vec::new(),
    };
    if plan.assignments.is_empty() {
        plan.unassigned = context.available_tasks.iter().cloned().collect();
        return plan;
    }

    let cap = op
        .constraints
        .get(MAX_TASKS_PER_TEAM)
        .and_then(|v| v.as_u64())
        .map(|v| v as usize);
    let has_room = |tasks: &Vec<String>| cap.map_or(true, |cap| tasks.len() < cap);

    let weights: Vec<f64> = match op.strategy {
        BalanceStrategy::RoundRobin => Vec::new(),
        BalanceStrategy::CapacityBased => weights(op, context, TEAM_CAPACITY_KEY),
        BalanceStrategy::PriorityWeighted => weights(op, context, TEAM_PRIORITY_KEY),
    };

    let mut next = 0;
    for task in &context.available_tasks {
        let slot = match op.strategy {
            BalanceStrategy::RoundRobin => {
                let count = plan.assignments.len();
                let found = (0..count)
                    .map(|offset| (next + offset) % count)
                    .find(|&i| has_room(&plan.assignments[i].1));
                if let Some(i) = found {
                    next = (i + 1) % count;
                }
                found
            }
            _ => plan
                .assignments
                .iter()
                .enumerate()
                .filter(|(_, (_, tasks))| has_room(tasks))
                .map(|(i, (_, tasks))| (i, tasks.len() as f64 / weights[i]))
                .fold(None, |best: Option<(usize, f64)>, (i, ratio)| match best {
                    Some((_, best_ratio)) if best_ratio <= ratio => best,
                    _ => Some((i, ratio)),
                })
                .map(|(i, _)| i),
        };

        match slot {
            Some(i) => plan.assignments[i].1.push(task.clone()),
            None => plan.unassigned.push(task.clone()),
        }
    }

    plan
}

fn weights(op: &LoadBalanceOperation, context: &CommandContext, key: &str) -> Vec<f64> {
    op.teams
        .iter()
        .map(|team| {
            context
                .team_weight(key, team)
                .filter(|w| *w > 0.0)
                .unwrap_or(1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wave_models::CommandContextBuilder;

    fn op(teams: &[&str], strategy: BalanceStrategy, cap: Option<u64>) -> LoadBalanceOperation {
        let mut constraints = BTreeMap::new();
        if let Some(cap) = cap {
            constraints.insert(MAX_TASKS_PER_TEAM.to_string(), serde_json::json!(cap));
        }
        LoadBalanceOperation {
            teams: teams.iter().map(|t| t.to_string()).collect(),
            strategy,
            constraints,
        }
    }

    fn tasks(plan: &DistributionPlan, team: &str) -> Vec<String> {
        plan.assignments
            .iter()
            .find(|(t, _)| t == team)
            .map(|(_, tasks)| tasks.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_round_robin() {
        let context = CommandContextBuilder::new("acme/platform", 1)
            .tasks(["1", "2", "3", "4", "5"])
            .build();
        let plan = plan_distribution(&op(&["team-a", "team-b"], BalanceStrategy::RoundRobin, None), &context);

        assert_eq!(tasks(&plan, "team-a"), vec!["1", "3", "5"]);
        assert_eq!(tasks(&plan, "team-b"), vec!["2", "4"]);
        assert!(plan.unassigned.is_empty());
        assert_eq!(plan.assigned_count(), 5);
    }

    #[test]
    fn test_cap_leaves_tasks_unassigned() {
        let context = CommandContextBuilder::new("acme/platform", 1)
            .tasks(["1", "2", "3", "4", "5"])
            .build();
        let plan = plan_distribution(&op(&["team-a", "team-b"], BalanceStrategy::RoundRobin, Some(2)), &context);

        assert_eq!(tasks(&plan, "team-a"), vec!["1", "3"]);
        assert_eq!(tasks(&plan, "team-b"), vec!["2", "4"]);
        assert_eq!(plan.unassigned, vec!["5"]);
    }

    #[test]
    fn test_capacity_based_follows_weights() {
        let context = CommandContextBuilder::new("acme/platform", 1)
            .tasks(["1", "2", "3", "4", "5", "6"])
            .state("team_capacity", serde_json::json!({"team-a": 2, "team-b": 1}))
            .build();
        let plan = plan_distribution(&op(&["team-a", "team-b"], BalanceStrategy::CapacityBased, None), &context);

        assert_eq!(tasks(&plan, "team-a").len(), 4);
        assert_eq!(tasks(&plan, "team-b").len(), 2);
    }

    #[test]
    fn test_priority_weights_default_to_one() {
        let context = CommandContextBuilder::new("acme/platform", 1)
            .tasks(["1", "2", "3", "4"])
            .build();
        let plan = plan_distribution(&op(&["team-a", "team-b"], BalanceStrategy::PriorityWeighted, None), &context);

        assert_eq!(tasks(&plan, "team-a"), vec!["1", "3"]);
        assert_eq!(tasks(&plan, "team-b"), vec!["2", "4"]);
    }

    #[test]
    fn test_no_tasks() {
        let context = CommandContextBuilder::new("acme/platform", 1).build();
        let plan = plan_distribution(&op(&["team-a"], BalanceStrategy::RoundRobin, None), &context);
        assert_eq!(plan.assigned_count(), 0);
        assert!(plan.unassigned.is_empty());
    }
}
