use super::{CombatError, CombatSession};
use crate::config::GameConfig;
use crate::grid::{TerrainKind, TileId};
use crate::pathfinding::find_nearest_free_tile;
use crate::player::CombatStat;
use crate::rng::RngOracle;
use crate::state::GameState;

/// How a fight ended by knockout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Defeat {
    pub winner: String,
    pub loser: String,
    /// Where the loser was put back on the board.
    pub respawn: TileId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker: String,
    pub defender: String,
    pub attack_score: i32,
    pub defense_score: i32,
    pub success: bool,
    pub damage: u32,
    pub defender_hp: u32,
    pub defeat: Option<Defeat>,
}

impl AttackOutcome {
    pub fn ends_combat(&self) -> bool {
        self.defeat.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeOutcome {
    pub actor: String,
    pub attempts_left: u32,
    pub succeeded: bool,
}

/// `actor` strikes the other fighter.
///
/// Scores are the stat value plus a roll of its bonus die, minus the ice
/// penalty for a fighter standing on ice. The attack lands when its score is
/// strictly higher and deals the difference as damage. A knockout awards the
/// attacker a win, heals both fighters and sends the loser back to spawn.
pub fn perform_attack(
    state: &mut GameState,
    session: &mut CombatSession,
    actor: &str,
    rng: &mut dyn RngOracle,
    config: &GameConfig,
) -> Result<AttackOutcome, CombatError> {
    session.ensure_turn(actor)?;
    let target = session
        .opponent_of(actor)
        .ok_or_else(|| CombatError::NotACombatant(actor.to_owned()))?
        .to_owned();

    let attacker = state
        .player(actor)
        .ok_or_else(|| CombatError::UnknownPlayer(actor.to_owned()))?;
    let defender = state
        .player(&target)
        .ok_or_else(|| CombatError::UnknownPlayer(target.clone()))?;
    let (attack, defense) = (attacker.attack, defender.defense);

    let attack_roll = if session.is_debug_mode() {
        attack.bonus_die.sides()
    } else {
        rng.roll_die(attack.bonus_die)
    };
    let defense_roll = if session.is_debug_mode() {
        config.debug_defense_roll
    } else {
        rng.roll_die(defense.bonus_die)
    };
    let attack_score = score(state, actor, attack, attack_roll, config);
    let defense_score = score(state, &target, defense, defense_roll, config);

    let success = attack_score > defense_score;
    let damage = if success {
        (attack_score - defense_score).unsigned_abs()
    } else {
        0
    };

    let defender = state
        .player_mut(&target)
        .ok_or_else(|| CombatError::UnknownPlayer(target.clone()))?;
    let defender_hp = defender.hp.damage(damage);

    let defeat = if defender.hp.is_depleted() {
        let (winner, loser) = state
            .pair_mut(actor, &target)
            .ok_or_else(|| CombatError::UnknownPlayer(target.clone()))?;
        winner.wins += 1;
        winner.hp.restore();
        loser.hp.restore();
        let respawn = respawn(state, &target)?;
        session.resolve(Some(actor), false);
        Some(Defeat {
            winner: actor.to_owned(),
            loser: target.clone(),
            respawn,
        })
    } else {
        session.pass_turn();
        None
    };

    Ok(AttackOutcome {
        attacker: actor.to_owned(),
        defender: target,
        attack_score,
        defense_score,
        success,
        damage,
        defender_hp,
        defeat,
    })
}

/// `actor` spends an escape attempt and tries to leave the fight.
///
/// The attempt is consumed before the roll, whether or not it succeeds. A
/// successful escape heals both fighters and resolves the fight without a
/// winner; a failed one passes the turn.
pub fn attempt_escape(
    state: &mut GameState,
    session: &mut CombatSession,
    actor: &str,
    rng: &mut dyn RngOracle,
    config: &GameConfig,
) -> Result<EscapeOutcome, CombatError> {
    session.ensure_turn(actor)?;
    let attempts_left = session.consume_escape(actor)?;

    let succeeded = rng.chance(config.escape_chance_percent);
    if succeeded {
        restore_both(state, session);
        session.resolve(None, true);
    } else {
        session.pass_turn();
    }

    Ok(EscapeOutcome {
        actor: actor.to_owned(),
        attempts_left,
        succeeded,
    })
}

/// Ends the fight because `quitter` left the match.
///
/// The opponent is reported as the winner but no win is counted. Returns the
/// opponent's name.
pub fn abandon(
    state: &mut GameState,
    session: &mut CombatSession,
    quitter: &str,
) -> Result<String, CombatError> {
    if session.is_resolved() {
        return Err(CombatError::AlreadyResolved);
    }
    let opponent = session
        .opponent_of(quitter)
        .ok_or_else(|| CombatError::NotACombatant(quitter.to_owned()))?
        .to_owned();
    restore_both(state, session);
    session.resolve(Some(&opponent), false);
    Ok(opponent)
}

fn score(state: &GameState, name: &str, stat: CombatStat, roll: u32, config: &GameConfig) -> i32 {
    let on_ice = state
        .position_of(name)
        .and_then(|tile| state.grid().tile(tile))
        .is_some_and(|tile| tile.terrain == TerrainKind::Ice);
    let roll = i32::try_from(roll).unwrap_or(i32::MAX);
    let base = stat.value.saturating_add(roll);
    if on_ice {
        base.saturating_sub(config.ice_penalty)
    } else {
        base
    }
}

fn restore_both(state: &mut GameState, session: &CombatSession) {
    for name in [session.attacker(), session.defender()] {
        if let Some(player) = state.player_mut(name) {
            player.hp.restore();
        }
    }
}

/// Puts `name` back on its spawn tile, or the nearest free tile to it.
fn respawn(state: &mut GameState, name: &str) -> Result<TileId, CombatError> {
    let spawn = state
        .player(name)
        .map(|player| player.spawn)
        .ok_or_else(|| CombatError::UnknownPlayer(name.to_owned()))?;

    let current = state.position_of(name);
    if let Some(current) = current {
        state.grid_mut().remove_occupant(current, name)?;
    }
    let target = find_nearest_free_tile(state.grid(), spawn)
        .or(current)
        .ok_or_else(|| CombatError::NoFreeTile(name.to_owned()))?;
    state.grid_mut().place_occupant(target, name)?;
    Ok(target)
}
