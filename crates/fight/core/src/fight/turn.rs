//! Turn order and the active turn.

use core::fmt;
use std::time::Duration;

use crate::battle::Battle;
use crate::fight::{Action, ActionId, ActionResult};
use crate::fighter::{FighterId, TeamId};

/// Identifier of one turn, strictly increasing inside a fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnId(pub u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn:{}", self.0)
    }
}

/// Started action waiting for its display duration before being applied.
pub(crate) struct PendingAction {
    pub id: ActionId,
    pub action: Action,
    pub result: ActionResult,
    pub duration: Duration,
}

/// Listener fired once the pending action has been terminated.
pub type TerminationListener = Box<dyn FnOnce() + Send>;

/// The exclusive right of one fighter to act.
pub struct FightTurn {
    id: TurnId,
    fighter: FighterId,
    pub(crate) pending: Option<PendingAction>,
    pub(crate) listeners: Vec<TerminationListener>,
}

impl FightTurn {
    pub(crate) fn new(id: TurnId, fighter: FighterId) -> Self {
        Self {
            id,
            fighter,
            pending: None,
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn fighter(&self) -> FighterId {
        self.fighter
    }

    /// True while an action is pending.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn fire_listeners(&mut self) {
        for listener in std::mem::take(&mut self.listeners) {
            listener();
        }
    }
}

impl fmt::Debug for FightTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FightTurn")
            .field("id", &self.id)
            .field("fighter", &self.fighter)
            .field("busy", &self.is_busy())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Strategy computing the turn order when the fight starts.
pub trait FighterOrder: Send {
    fn compute(&self, battle: &Battle) -> Vec<FighterId>;
}

/// Alternates teams, highest initiative first inside each team.
///
/// The team holding the fighter with the best initiative starts. Ties are
/// broken by fighter id.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlternateTeamFighterOrder;

impl FighterOrder for AlternateTeamFighterOrder {
    fn compute(&self, battle: &Battle) -> Vec<FighterId> {
        let mut teams: Vec<(TeamId, Vec<(i32, FighterId)>)> = battle
            .teams()
            .iter()
            .map(|team| {
                let mut members: Vec<(i32, FighterId)> = team
                    .members
                    .iter()
                    .filter_map(|id| battle.fighter(*id))
                    .filter(|fighter| !fighter.is_dead())
                    .map(|fighter| (fighter.initiative(), fighter.id()))
                    .collect();
                members.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
                (team.id, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect();

        teams.sort_by(|(a_id, a), (b_id, b)| {
            let best = |members: &[(i32, FighterId)]| members.first().map(|entry| entry.0);
            best(b).cmp(&best(a)).then(a_id.cmp(b_id))
        });

        let longest = teams.iter().map(|(_, members)| members.len()).max().unwrap_or(0);
        let mut order = Vec::new();
        for index in 0..longest {
            for (_, members) in &teams {
                if let Some((_, id)) = members.get(index) {
                    order.push(*id);
                }
            }
        }
        order
    }
}

/// Circular list of fighters in play order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnList {
    order: Vec<FighterId>,
    position: Option<usize>,
}

impl TurnList {
    pub fn new(order: Vec<FighterId>) -> Self {
        Self {
            order,
            position: None,
        }
    }

    pub fn fighters(&self) -> &[FighterId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn current(&self) -> Option<FighterId> {
        self.position.and_then(|index| self.order.get(index).copied())
    }

    /// Moves to the next fighter, wrapping around.
    pub fn advance(&mut self) -> Option<FighterId> {
        if self.order.is_empty() {
            return None;
        }
        let next = match self.position {
            Some(index) => (index + 1) % self.order.len(),
            None => 0,
        };
        self.position = Some(next);
        self.order.get(next).copied()
    }

    /// Inserts `fighter` right after `anchor`, or at the end if `anchor` is unknown.
    pub fn insert_after(&mut self, anchor: FighterId, fighter: FighterId) {
        let index = self
            .order
            .iter()
            .position(|id| *id == anchor)
            .map_or(self.order.len(), |index| index + 1);
        self.order.insert(index, fighter);
        if let Some(position) = self.position
            && index <= position
        {
            self.position = Some(position + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::{AccountId, Characteristic, FighterSpec};
    use crate::grid::{Battlefield, CellId};

    fn fighter(initiative: i32) -> FighterSpec {
        FighterSpec::player(AccountId(1), "fighter", 50)
            .with_characteristic(Characteristic::Initiative, initiative)
    }

    #[test]
    fn order_alternates_teams_by_initiative() {
        let mut battle = Battle::new(Battlefield::open(5, 5));
        let red = battle.add_team(Vec::new()).unwrap();
        let blue = battle.add_team(Vec::new()).unwrap();
        let r1 = battle.insert_fighter(red, CellId(0), fighter(10)).unwrap();
        let r2 = battle.insert_fighter(red, CellId(1), fighter(30)).unwrap();
        let r3 = battle.insert_fighter(red, CellId(2), fighter(5)).unwrap();
        let b1 = battle.insert_fighter(blue, CellId(3), fighter(50)).unwrap();
        let b2 = battle.insert_fighter(blue, CellId(4), fighter(20)).unwrap();

        let order = AlternateTeamFighterOrder.compute(&battle);
        assert_eq!(order, vec![b1, r2, b2, r1, r3]);
    }

    #[test]
    fn insert_after_keeps_the_current_fighter() {
        let mut list = TurnList::new(vec![FighterId(1), FighterId(2), FighterId(3)]);
        list.advance();
        list.advance();
        assert_eq!(list.current(), Some(FighterId(2)));

        list.insert_after(FighterId(1), FighterId(9));
        assert_eq!(list.current(), Some(FighterId(2)));
        list.insert_after(FighterId(2), FighterId(8));
        assert_eq!(list.advance(), Some(FighterId(8)));
        assert_eq!(list.advance(), Some(FighterId(3)));
        assert_eq!(list.advance(), Some(FighterId(1)));
        assert_eq!(list.advance(), Some(FighterId(9)));
    }
}
