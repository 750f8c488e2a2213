//! Home arrivals, projectile hits and kill rewards.

use rand::Rng;
use village_defence_core::{Event, WorldRect};

use crate::{
    bullets::BulletRegistry,
    coins::CoinRegistry,
    enemies::Enemy,
    ledger::Home,
};

/// Reports kills and rolls their coin drops.
pub(crate) struct KillRewards<'a, R> {
    coins: &'a mut CoinRegistry,
    rng: &'a mut R,
}

impl<'a, R: Rng> KillRewards<'a, R> {
    pub(crate) fn new(coins: &'a mut CoinRegistry, rng: &'a mut R) -> Self {
        Self { coins, rng }
    }

    /// Announces the kill, then drops a coin with the enemy's reward ratio.
    pub(crate) fn record_kill(&mut self, enemy: &Enemy, out_events: &mut Vec<Event>) {
        out_events.push(Event::EnemyKilled {
            enemy: enemy.id(),
            kind: enemy.kind(),
            position: enemy.position(),
        });

        if self.rng.gen::<f32>() <= enemy.reward_ratio() {
            let position = enemy.position();
            let coin = self.coins.spawn(position, &mut *self.rng);
            out_events.push(Event::CoinDropped { coin, position });
        }
    }
}

/// Removes live enemies standing on the home tile and charges their damage.
pub(crate) fn resolve_home_arrivals(
    enemies: &mut [Enemy],
    home_area: Option<WorldRect>,
    home: &mut Home,
    out_events: &mut Vec<Event>,
) {
    let Some(area) = home_area else {
        return;
    };

    for enemy in enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
        if !area.contains(enemy.position()) {
            continue;
        }

        enemy.mark_arrived();
        home.take_damage(enemy.damage());
        out_events.push(Event::EnemyReachedHome {
            enemy: enemy.id(),
            damage: enemy.damage(),
        });
        out_events.push(Event::HomeDamaged { hp: home.hp() });
    }
}

/// Tests every collidable projectile against every live enemy box.
///
/// Enemies are visited in registry order and each is checked against all
/// projectiles. A projectile stops being collidable on its first hit, so it
/// damages at most one struck enemy (plus its splash) per tick. Projectiles
/// overlapping an enemy killed earlier in the same pass still strike it; only
/// the killing blow rolls for a coin.
pub(crate) fn resolve_bullet_hits<R: Rng>(
    enemies: &mut [Enemy],
    bullets: &mut BulletRegistry,
    rewards: &mut KillRewards<'_, R>,
    out_events: &mut Vec<Event>,
) {
    for index in 0..enemies.len() {
        if !enemies[index].is_alive() {
            continue;
        }
        let bounds = enemies[index].bounds();

        for bullet in bullets.iter_mut() {
            if !bullet.is_collidable() || !bounds.contains(bullet.position()) {
                continue;
            }

            let impact = bullet.position();
            let damage = bullet.damage();
            let radius = bullet.kind().damage_radius();

            if radius < 0.0 {
                let struck = &mut enemies[index];
                if struck.take_damage(damage) {
                    rewards.record_kill(struck, out_events);
                }
            } else {
                for enemy in enemies.iter_mut() {
                    if enemy.position().distance(impact) <= radius && enemy.take_damage(damage) {
                        rewards.record_kill(enemy, out_events);
                    }
                }
            }

            bullet.on_collide(&mut enemies[index]);
            out_events.push(Event::BulletImpact {
                bullet: bullet.id(),
                kind: bullet.kind(),
                position: impact,
            });
        }
    }
}
