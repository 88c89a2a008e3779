use std::sync::Arc;

use dashmap::{DashMap, Entry};
use nanoid::nanoid;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::logic::Engine;

/// One engine per UI session. Each call holds the engine's lock for its whole duration.
pub type Sessions = Arc<DashMap<String, Arc<Mutex<Engine>>>>;

pub fn create_sessions() -> Sessions {
    Arc::new(DashMap::new())
}

#[instrument(level = "trace", skip(sessions, engine))]
pub fn add_session(sessions: &Sessions, engine: Engine) -> String {
    let rules = engine.rules();
    debug!(
        "New engine accepts boards {}..={} with densities {}%/{}%/{}%, safe zone {:?}",
        rules.min_size,
        rules.max_size,
        rules.density.low,
        rules.density.middle,
        rules.density.high,
        rules.safe_zone
    );

    let mut id_length = 5;
    let max_attempts_per_length = 10;

    loop {
        for _ in 0..max_attempts_per_length {
            let id = nanoid!(id_length);
            match sessions.entry(id.clone()) {
                Entry::Occupied(_) => {
                    debug!("Session ID collision, trying another: {}", id);
                    continue;
                }
                Entry::Vacant(entry) => {
                    entry.insert(Arc::new(Mutex::new(engine)));
                    info!("Created session {}", id);
                    return id;
                }
            }
        }

        warn!(
            "Exhausted ID attempts at length {}, increasing to {}",
            id_length,
            id_length + 1
        );
        id_length += 1;
    }
}

pub fn find_session(sessions: &Sessions, id: &str) -> Option<Arc<Mutex<Engine>>> {
    sessions.get(id).map(|entry| entry.value().clone())
}

pub fn remove_session(sessions: &Sessions, id: &str) -> bool {
    let removed = sessions.remove(id).is_some();
    if removed {
        info!("Removed session {}, {} remaining", id, sessions.len());
    }
    removed
}
