//! Typed effect registry for techniques, traps and fields
//!
//! Card behaviour is data: each card id maps to a descriptor here and the
//! resolvers in `cards`, `combat` and `turn` interpret the descriptors.
//! Cards without an entry still play; they simply have no effect.

use crate::core::{BuffExpiry, CardId, Faction};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Which units a targeted technique may choose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetClass {
    AnyUnit,
    FriendlyUnit,
    EnemyUnit,
}

/// Technique effects that need no target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImmediateEffect {
    /// Add Wither stacks to every enemy unit
    WitherAllEnemies(i32),
    /// Exhaust every ready enemy unit
    ExhaustAllEnemies,
    /// Draw cards, with a bonus when the caster controls no field
    Draw { base: usize, bonus_without_field: usize },
    /// Gain energy now and skip the next turn-start energy gain
    EnergySurge(i32),
    DestroyEnemyField,
}

/// One step of a targeted technique, applied to the chosen unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetedAction {
    Buff {
        atk: i32,
        def: i32,
        spd: i32,
        expiry: BuffExpiry,
    },
    /// Un-exhaust the unit
    Ready,
    /// The unit is exhausted when the next turn starts
    ExhaustNextTurn,
    /// The unit cannot retaliate
    Bind,
    /// The unit cannot attack
    Petrify,
    /// Add Wither stacks only if the unit is Corrupted
    WitherIfCorrupt(i32),
    /// Corrupt the unit until the end of the current turn
    Override,
    /// Remove Wither, Corrupt, Petrify, binding and negative buffs
    Reboot,
}

impl TargetedAction {
    /// Whether the action helps the unit it lands on
    pub fn is_beneficial(&self) -> bool {
        match self {
            TargetedAction::Buff { atk, def, spd, .. } => atk + def + spd >= 0,
            TargetedAction::Ready | TargetedAction::Reboot => true,
            TargetedAction::ExhaustNextTurn
            | TargetedAction::Bind
            | TargetedAction::Petrify
            | TargetedAction::WitherIfCorrupt(_)
            | TargetedAction::Override => false,
        }
    }
}

/// What a technique does when played
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TechniqueEffect {
    Immediate(ImmediateEffect),
    Targeted {
        target: TargetClass,
        actions: SmallVec<[TargetedAction; 2]>,
    },
}

impl TechniqueEffect {
    /// A targeted technique is friendly-minded when its first action helps
    pub fn prefers_friendly_target(&self) -> bool {
        match self {
            TechniqueEffect::Immediate(_) => false,
            TechniqueEffect::Targeted { target, actions } => match target {
                TargetClass::FriendlyUnit => true,
                TargetClass::EnemyUnit => false,
                TargetClass::AnyUnit => actions.first().is_some_and(TargetedAction::is_beneficial),
            },
        }
    }
}

/// Game events traps listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    AttackDeclared,
    UnitDestroyedByAttack,
    UnitDeployed,
    UnitReadied,
    TechniquePlayed,
    FieldActivated,
    TrapActivated,
}

/// A concrete trigger occurrence, carrying the names used in prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    AttackDeclared { attacker: String },
    UnitDestroyedByAttack { destroyed: String, attacker: String },
    UnitDeployed { unit: String },
    UnitReadied { unit: String },
    TechniquePlayed { technique: String },
    FieldActivated { field: String },
    TrapActivated { trap: String },
}

impl TriggerEvent {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            TriggerEvent::AttackDeclared { .. } => TriggerType::AttackDeclared,
            TriggerEvent::UnitDestroyedByAttack { .. } => TriggerType::UnitDestroyedByAttack,
            TriggerEvent::UnitDeployed { .. } => TriggerType::UnitDeployed,
            TriggerEvent::UnitReadied { .. } => TriggerType::UnitReadied,
            TriggerEvent::TechniquePlayed { .. } => TriggerType::TechniquePlayed,
            TriggerEvent::FieldActivated { .. } => TriggerType::FieldActivated,
            TriggerEvent::TrapActivated { .. } => TriggerType::TrapActivated,
        }
    }

    /// Text shown to the defender when a trap can respond
    pub fn message(&self) -> String {
        match self {
            TriggerEvent::AttackDeclared { attacker } => format!("{attacker} is attacking!"),
            TriggerEvent::UnitDestroyedByAttack { destroyed, attacker } => {
                format!("{destroyed} was destroyed by {attacker}!")
            }
            TriggerEvent::UnitDeployed { unit } => format!("{unit} has been deployed!"),
            TriggerEvent::UnitReadied { unit } => format!("{unit} has become ready!"),
            TriggerEvent::TechniquePlayed { technique } => format!("{technique} is being played!"),
            TriggerEvent::FieldActivated { field } => format!("{field} has been activated!"),
            TriggerEvent::TrapActivated { trap } => format!("{trap} has been activated!"),
        }
    }
}

/// What an activated trap does to the attack it answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapEffect {
    /// Paid and discarded with no further effect
    Inert,
    CancelAttack { exhaust_attacker: bool },
    /// Cancel and return the attacker to its owner's hand
    ReturnAttackerToHand,
    /// Wither the attacker; the attack continues
    WitherAttacker(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapDefinition {
    pub trigger: TriggerType,
    pub effect: TrapEffect,
}

/// Continuous effects of a field card, from its controller's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEffect {
    /// Units of the faction cost less, never below 1
    CostReduction { faction: String, amount: i32 },
    /// Turn start: gain energy if below the threshold and a faction unit is deployed
    StartOfTurnEnergy {
        faction: String,
        amount: i32,
        below: i32,
    },
    /// Destroying an enemy unit accrues next-turn energy
    EnergyOnEnemyDestroyed,
    /// Losing an attacker of the faction to retaliation accrues next-turn energy
    EnergyOnAttackerLost { faction: String },
    /// Turn start: Wither every enemy unit
    StartOfTurnWitherEnemies(i32),
    /// Enemy units enter with Wither
    WitherOnEnemyDeploy(i32),
    /// Both players may control at most this many units
    BoardLimit(usize),
}

/// Lookup tables from card id to effect descriptor
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    techniques: FxHashMap<CardId, TechniqueEffect>,
    traps: FxHashMap<CardId, TrapDefinition>,
    fields: FxHashMap<CardId, FieldEffect>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_technique(&mut self, id: &str, effect: TechniqueEffect) {
        self.techniques.insert(CardId::new(id), effect);
    }

    pub fn register_trap(&mut self, id: &str, trigger: TriggerType, effect: TrapEffect) {
        self.traps.insert(CardId::new(id), TrapDefinition { trigger, effect });
    }

    pub fn register_field(&mut self, id: &str, effect: FieldEffect) {
        self.fields.insert(CardId::new(id), effect);
    }

    pub fn technique(&self, id: &CardId) -> Option<&TechniqueEffect> {
        self.techniques.get(id)
    }

    pub fn trap(&self, id: &CardId) -> Option<&TrapDefinition> {
        self.traps.get(id)
    }

    pub fn field(&self, id: &CardId) -> Option<&FieldEffect> {
        self.fields.get(id)
    }

    /// Effects for every card in the starter decks
    pub fn standard() -> Self {
        use ImmediateEffect as I;
        use TargetClass::*;
        use TargetedAction as A;

        let mut reg = EffectRegistry::new();
        let targeted = |target, actions| TechniqueEffect::Targeted { target, actions };
        let buff = |atk, def, spd, expiry| A::Buff { atk, def, spd, expiry };

        reg.register_technique("miasma_encroaching_fog", TechniqueEffect::Immediate(I::WitherAllEnemies(1)));
        reg.register_technique("miasma_choking_spores", TechniqueEffect::Immediate(I::ExhaustAllEnemies));
        reg.register_technique(
            "generic_salvage_the_ruins",
            TechniqueEffect::Immediate(I::Draw {
                base: 1,
                bonus_without_field: 1,
            }),
        );
        reg.register_technique("generic_arcane_surge", TechniqueEffect::Immediate(I::EnergySurge(3)));
        reg.register_technique("generic_travelling_merchant", TechniqueEffect::Immediate(I::DestroyEnemyField));
        reg.register_technique("generic_eviction_notice", TechniqueEffect::Immediate(I::DestroyEnemyField));

        reg.register_technique(
            "generic_food_rations",
            targeted(AnyUnit, smallvec![buff(0, 1, 0, BuffExpiry::StartNextTurn)]),
        );
        reg.register_technique(
            "skyforge_software_update",
            targeted(AnyUnit, smallvec![buff(1, -1, 0, BuffExpiry::EndTurn)]),
        );
        reg.register_technique(
            "generic_emergency_repairs",
            targeted(FriendlyUnit, smallvec![buff(0, 2, 0, BuffExpiry::StartNextTurn)]),
        );
        reg.register_technique(
            "generic_adrenal_rush",
            targeted(FriendlyUnit, smallvec![A::Ready, buff(1, 0, 0, BuffExpiry::EndTurn)]),
        );
        reg.register_technique(
            "skyforge_velocity_patch",
            targeted(AnyUnit, smallvec![buff(0, 0, 2, BuffExpiry::EndTurn), A::ExhaustNextTurn]),
        );
        reg.register_technique("generic_veil_of_binding", targeted(EnemyUnit, smallvec![A::Bind]));
        reg.register_technique("miasma_petrify", targeted(AnyUnit, smallvec![A::Petrify]));
        reg.register_technique("miasma_toxic_sludge", targeted(EnemyUnit, smallvec![A::WitherIfCorrupt(2)]));
        reg.register_technique("skyforge_override", targeted(AnyUnit, smallvec![A::Override]));
        reg.register_technique("skyforge_reboot", targeted(AnyUnit, smallvec![A::Reboot]));

        use TriggerType::*;
        reg.register_trap(
            "skyforge_counter_measure",
            AttackDeclared,
            TrapEffect::CancelAttack { exhaust_attacker: true },
        );
        reg.register_trap(
            "skyforge_decoy_protocol",
            AttackDeclared,
            TrapEffect::CancelAttack { exhaust_attacker: false },
        );
        reg.register_trap(
            "generic_false_step",
            AttackDeclared,
            TrapEffect::CancelAttack { exhaust_attacker: false },
        );
        reg.register_trap("generic_return_to_sender", AttackDeclared, TrapEffect::ReturnAttackerToHand);
        reg.register_trap("miasma_rot_beneath_the_surface", AttackDeclared, TrapEffect::WitherAttacker(1));
        reg.register_trap("skyforge_self_destruct", UnitDestroyedByAttack, TrapEffect::Inert);
        reg.register_trap("skyforge_lockdown", UnitDeployed, TrapEffect::Inert);
        reg.register_trap("miasma_miasma_potion", UnitDeployed, TrapEffect::Inert);
        reg.register_trap("generic_flute_of_slumber", UnitReadied, TrapEffect::Inert);
        reg.register_trap("miasma_foglash", TechniquePlayed, TrapEffect::Inert);
        reg.register_trap("generic_earthquake", FieldActivated, TrapEffect::Inert);
        reg.register_trap("generic_counter_sigil", TrapActivated, TrapEffect::Inert);

        let skyforge = || Faction::SKYFORGE.to_string();
        reg.register_field(
            "skyforge_assembly_line",
            FieldEffect::CostReduction {
                faction: skyforge(),
                amount: 1,
            },
        );
        reg.register_field(
            "skyforge_relay_node",
            FieldEffect::StartOfTurnEnergy {
                faction: skyforge(),
                amount: 1,
                below: 5,
            },
        );
        reg.register_field("skyforge_kill_zone", FieldEffect::EnergyOnEnemyDestroyed);
        reg.register_field(
            "skyforge_rustfields",
            FieldEffect::EnergyOnAttackerLost { faction: skyforge() },
        );
        reg.register_field("miasma_lowlands_mist", FieldEffect::StartOfTurnWitherEnemies(1));
        reg.register_field("miasma_blight_pools", FieldEffect::WitherOnEnemyDeploy(1));
        reg.register_field("miasma_rotfall_expanse", FieldEffect::BoardLimit(3));

        reg
    }
}
