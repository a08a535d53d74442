//! Fight outcome and rewards.

use crate::battle::Battle;
use crate::fighter::{Fighter, FighterId, TeamId};

/// Rewards granted to one fighter. Computed by an external calculator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub experience: u64,
    pub kamas: u64,
}

/// Computes the reward of each fighter once the fight has ended.
pub trait RewardCalculator: Send {
    fn reward(&self, battle: &Battle, fighter: &Fighter, winner: bool) -> Reward;
}

/// Grants nothing. Used by challenge fights and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReward;

impl RewardCalculator for NoReward {
    fn reward(&self, _battle: &Battle, _fighter: &Fighter, _winner: bool) -> Reward {
        Reward::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Winner,
    Loser,
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterResult {
    pub fighter: FighterId,
    pub team: TeamId,
    pub outcome: Outcome,
    pub fled: bool,
    pub reward: Reward,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightResults {
    pub winner: Option<TeamId>,
    pub fighters: Vec<FighterResult>,
}

impl FightResults {
    /// Results of every regular fighter; invocations are left out. Fled
    /// fighters always lose.
    pub fn compute(battle: &Battle, winner: Option<TeamId>, rewards: &dyn RewardCalculator) -> Self {
        let fighters = battle
            .fighters()
            .filter(|fighter| !fighter.kind().is_invocation())
            .map(|fighter| {
                let won = winner == Some(fighter.team()) && !fighter.has_fled();
                let outcome = match winner {
                    None if !fighter.has_fled() => Outcome::Draw,
                    _ if won => Outcome::Winner,
                    _ => Outcome::Loser,
                };
                FighterResult {
                    fighter: fighter.id(),
                    team: fighter.team(),
                    outcome,
                    fled: fighter.has_fled(),
                    reward: rewards.reward(battle, fighter, won),
                }
            })
            .collect();
        Self { winner, fighters }
    }

    pub fn winners(&self) -> impl Iterator<Item = &FighterResult> {
        self.fighters
            .iter()
            .filter(|result| result.outcome == Outcome::Winner)
    }

    pub fn losers(&self) -> impl Iterator<Item = &FighterResult> {
        self.fighters
            .iter()
            .filter(|result| result.outcome == Outcome::Loser)
    }
}
