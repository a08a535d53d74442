//! Fighter model: identity, life, characteristics, states and buffs.
//!
//! A [`Fighter`] is exclusively owned by its fight. Player fighters only hold
//! the account id of the persistent player; everything the rules need is
//! copied into the fighter when it joins.
mod characteristics;
mod life;
mod points;
mod states;

use core::fmt;
use std::cell::OnceCell;

pub use characteristics::{Characteristic, Characteristics, Modifier, compute};
pub use life::Life;
pub use points::TurnPoints;
pub use states::{FighterStates, StateExpiry, StateId};

use crate::buff::BuffList;
use crate::env::{MonsterGrade, MonsterId, SpellRef};
use crate::grid::{CellId, Direction};

/// Unique identifier of a fighter inside one fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterId(pub u32);

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a team inside one fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team:{}", self.0)
    }
}

/// Non-owning reference to a persistent player account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountId(pub u64);

/// Closed set of fighter variants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FighterKind {
    Player { account: AccountId, name: String },
    Monster { monster: MonsterId, grade: u8 },
    Invocation {
        invoker: FighterId,
        monster: MonsterId,
        grade: u8,
    },
}

impl FighterKind {
    /// Monsters and invocations are played by the AI.
    pub fn is_ai_controlled(&self) -> bool {
        !matches!(self, Self::Player { .. })
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation { .. })
    }

    pub fn invoker(&self) -> Option<FighterId> {
        match self {
            Self::Invocation { invoker, .. } => Some(*invoker),
            _ => None,
        }
    }
}

/// Everything needed to add a fighter to a fight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FighterSpec {
    pub kind: FighterKind,
    pub life: Life,
    pub characteristics: Characteristics,
    pub spells: Vec<SpellRef>,
}

impl FighterSpec {
    pub fn player(account: AccountId, name: impl Into<String>, life: i32) -> Self {
        Self {
            kind: FighterKind::Player {
                account,
                name: name.into(),
            },
            life: Life::new(life),
            characteristics: Characteristics::new(),
            spells: Vec::new(),
        }
    }

    /// Fighter spec built from a monster grade.
    pub fn monster(monster: MonsterId, grade: &MonsterGrade) -> Self {
        Self {
            kind: FighterKind::Monster {
                monster,
                grade: grade.grade,
            },
            life: Life::new(grade.life),
            characteristics: Self::grade_characteristics(grade),
            spells: grade.spells.clone(),
        }
    }

    /// Invocation spec: same statistics as the monster, bound to its invoker.
    pub fn invocation(invoker: FighterId, monster: MonsterId, grade: &MonsterGrade) -> Self {
        Self {
            kind: FighterKind::Invocation {
                invoker,
                monster,
                grade: grade.grade,
            },
            ..Self::monster(monster, grade)
        }
    }

    #[must_use]
    pub fn with_characteristic(mut self, characteristic: Characteristic, value: i32) -> Self {
        self.characteristics.set(characteristic, value);
        self
    }

    #[must_use]
    pub fn with_spell(mut self, spell: SpellRef) -> Self {
        self.spells.push(spell);
        self
    }

    fn grade_characteristics(grade: &MonsterGrade) -> Characteristics {
        let mut characteristics = Characteristics::new()
            .with(Characteristic::ActionPoints, grade.action_points)
            .with(Characteristic::MovementPoints, grade.movement_points)
            .with(Characteristic::Initiative, grade.initiative);
        for entry in &grade.characteristics {
            characteristics.add(entry.characteristic, entry.value);
        }
        characteristics
    }
}

/// A combat participant.
#[derive(Clone, Debug)]
pub struct Fighter {
    id: FighterId,
    kind: FighterKind,
    team: TeamId,
    cell: CellId,
    orientation: Direction,
    life: Life,
    base: Characteristics,
    computed: OnceCell<Characteristics>,
    buffs: BuffList,
    states: FighterStates,
    spells: Vec<SpellRef>,
    hidden: bool,
    fled: bool,
    ready: bool,
    turn_points: Option<TurnPoints>,
}

impl Fighter {
    pub fn new(id: FighterId, team: TeamId, cell: CellId, spec: FighterSpec) -> Self {
        let ready = spec.kind.is_ai_controlled();
        Self {
            id,
            kind: spec.kind,
            team,
            cell,
            orientation: Direction::default(),
            life: spec.life,
            base: spec.characteristics,
            computed: OnceCell::new(),
            buffs: BuffList::default(),
            states: FighterStates::default(),
            spells: spec.spells,
            hidden: false,
            fled: false,
            ready,
            turn_points: None,
        }
    }

    pub fn id(&self) -> FighterId {
        self.id
    }

    pub fn kind(&self) -> &FighterKind {
        &self.kind
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn set_cell(&mut self, cell: CellId) {
        self.cell = cell;
    }

    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Direction) {
        self.orientation = orientation;
    }

    pub fn life(&self) -> &Life {
        &self.life
    }

    pub fn life_mut(&mut self) -> &mut Life {
        &mut self.life
    }

    pub fn is_dead(&self) -> bool {
        self.life.is_dead()
    }

    pub fn base_characteristics(&self) -> &Characteristics {
        &self.base
    }

    /// Final characteristics (base plus active buff modifiers), memoized.
    pub fn characteristics(&self) -> &Characteristics {
        self.computed
            .get_or_init(|| compute(&self.base, self.buffs.modifiers()))
    }

    pub fn buffs(&self) -> &BuffList {
        &self.buffs
    }

    /// Mutable buff access. Drops the memoized characteristics.
    pub fn buffs_mut(&mut self) -> &mut BuffList {
        self.computed.take();
        &mut self.buffs
    }

    pub fn states(&self) -> &FighterStates {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut FighterStates {
        &mut self.states
    }

    pub fn spells(&self) -> &[SpellRef] {
        &self.spells
    }

    pub fn knows(&self, spell: SpellRef) -> bool {
        self.spells.contains(&spell)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn has_fled(&self) -> bool {
        self.fled
    }

    pub fn set_fled(&mut self) {
        self.fled = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn initiative(&self) -> i32 {
        self.characteristics().get(Characteristic::Initiative)
    }

    /// Points left in the current turn, when this fighter is playing.
    pub fn turn_points(&self) -> Option<&TurnPoints> {
        self.turn_points.as_ref()
    }

    pub fn turn_points_mut(&mut self) -> Option<&mut TurnPoints> {
        self.turn_points.as_mut()
    }

    pub fn is_playing(&self) -> bool {
        self.turn_points.is_some()
    }

    /// Grants turn points from the current characteristics.
    pub(crate) fn begin_turn(&mut self) {
        let characteristics = self.characteristics();
        let points = TurnPoints::new(
            characteristics.get(Characteristic::ActionPoints),
            characteristics.get(Characteristic::MovementPoints),
        );
        self.turn_points = Some(points);
    }

    pub(crate) fn end_turn(&mut self) {
        self.turn_points = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::{Buff, BuffId};
    use crate::effect::{EffectKind, SpellEffect};

    fn fighter() -> Fighter {
        let spec = FighterSpec::player(AccountId(1), "hero", 100)
            .with_characteristic(Characteristic::Strength, 20)
            .with_characteristic(Characteristic::ActionPoints, 6);
        Fighter::new(FighterId(1), TeamId(0), CellId(0), spec)
    }

    #[test]
    fn characteristics_follow_buff_list() {
        let mut fighter = fighter();
        assert_eq!(fighter.characteristics().get(Characteristic::Strength), 20);

        let effect = SpellEffect::new(EffectKind::AddCharacteristic(Characteristic::Strength))
            .with_value(10, 0)
            .with_duration(2);
        let buff = Buff::new(BuffId(1), effect, 10, None, FighterId(2), FighterId(1));
        fighter.buffs_mut().push(buff);
        assert_eq!(fighter.characteristics().get(Characteristic::Strength), 30);

        fighter.buffs_mut().remove(BuffId(1));
        assert_eq!(fighter.characteristics().get(Characteristic::Strength), 20);
    }

    #[test]
    fn turn_points_come_from_characteristics() {
        let mut fighter = fighter();
        assert!(!fighter.is_playing());
        fighter.begin_turn();
        assert_eq!(fighter.turn_points().map(|p| p.action_points()), Some(6));
        fighter.end_turn();
        assert!(fighter.turn_points().is_none());
    }

    #[test]
    fn monsters_are_ready_by_default() {
        let grade = MonsterGrade {
            grade: 1,
            life: 30,
            initiative: 10,
            action_points: 4,
            movement_points: 2,
            characteristics: Vec::new(),
            spells: Vec::new(),
        };
        let spec = FighterSpec::monster(MonsterId(31), &grade);
        let fighter = Fighter::new(FighterId(2), TeamId(1), CellId(3), spec);
        assert!(fighter.is_ready());
        assert!(fighter.kind().is_ai_controlled());
        assert_eq!(fighter.initiative(), 10);
    }
}
