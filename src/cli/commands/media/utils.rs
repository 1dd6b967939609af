use crate::{
    cli::{ArgType, CliError, CommandArg, EngineFactory},
    services::mpris::{PlayerId, SyncEngine},
};

/// Optional trailing player argument shared by the control verbs
pub fn player_arg() -> CommandArg {
    CommandArg {
        name: "player".to_string(),
        description: "Roster index (1, 2, ...) or name prefix (e.g. 'spotify'). Uses the selected player if omitted.".to_string(),
        required: false,
        value_type: ArgType::Player,
    }
}

/// Build and initialize an engine.
///
/// # Errors
///
/// Returns a media service error, after disposing the engine, when the
/// control program is missing.
pub async fn start_engine(factory: &EngineFactory) -> Result<SyncEngine, CliError> {
    let engine = factory()?;
    engine.initialize().await;

    let snapshot = engine.snapshot();
    if !snapshot.is_installed {
        engine.dispose();
        return Err(CliError::media(
            snapshot
                .error
                .unwrap_or_else(|| "Control program not installed".to_string()),
        ));
    }

    Ok(engine)
}

/// Finds a player by identifier (index or name prefix).
///
/// Supports:
/// - Numeric indices (1-based) into the roster
/// - Exact identifiers, including instance-qualified ones
/// - Case-insensitive prefixes ("spot" matches "spotify")
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if nothing matches or the prefix is
/// ambiguous.
pub fn find_player_by_identifier(
    players: &[PlayerId],
    identifier: &str,
) -> Result<PlayerId, CliError> {
    let invalid = |reason: String| CliError::InvalidArgument {
        arg: "player".to_string(),
        reason,
    };

    if players.is_empty() {
        return Err(invalid("No media players found".to_string()));
    }

    if let Ok(index) = identifier.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|index| players.get(index))
            .cloned()
            .ok_or_else(|| {
                invalid(format!(
                    "Invalid player index. Valid range: 1-{}",
                    players.len()
                ))
            });
    }

    if let Some(exact) = players.iter().find(|player| player.as_str() == identifier) {
        return Ok(exact.clone());
    }

    let identifier_lower = identifier.to_lowercase();
    let matches: Vec<&PlayerId> = players
        .iter()
        .filter(|player| player.as_str().to_lowercase().starts_with(&identifier_lower))
        .collect();

    match matches.as_slice() {
        [] => Err(invalid(format!("No player found matching '{identifier}'"))),
        [single] => Ok((*single).clone()),
        several => {
            let names: Vec<&str> = several.iter().map(|player| player.as_str()).collect();
            Err(invalid(format!(
                "Multiple players match '{identifier}': {}. Please be more specific.",
                names.join(", ")
            )))
        }
    }
}

/// Player the command acts on.
///
/// With an identifier the engine switches to the matching player first;
/// without one the engine's own selection is used.
///
/// # Errors
///
/// Returns `CliError` if the identifier does not resolve, the switch fails,
/// or there is no player at all.
pub async fn resolve_player(
    engine: &SyncEngine,
    identifier: Option<&String>,
) -> Result<PlayerId, CliError> {
    let snapshot = engine.snapshot();

    let Some(identifier) = identifier else {
        return snapshot.selected_player.ok_or_else(|| {
            CliError::media(
                snapshot
                    .error
                    .unwrap_or_else(|| "No active media player".to_string()),
            )
        });
    };

    let player = find_player_by_identifier(&snapshot.players, identifier)?;
    if snapshot.selected_player.as_ref() != Some(&player) && !engine.switch_player(&player).await {
        return Err(CliError::media(format!("Could not switch to {player}")));
    }

    Ok(player)
}

/// Split `[mode] [player]` arguments.
///
/// A lone argument that `parse` rejects is taken as the player. With two
/// arguments the first must be a mode.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` when two arguments are given and the
/// first is not a mode.
pub fn split_mode_and_player<'a, M>(
    args: &'a [String],
    arg_name: &str,
    parse: impl Fn(&str) -> Option<M>,
) -> Result<(Option<M>, Option<&'a String>), CliError> {
    match args {
        [] => Ok((None, None)),
        [only] => match parse(only) {
            Some(mode) => Ok((Some(mode), None)),
            None => Ok((None, Some(only))),
        },
        [first, player, ..] => match parse(first) {
            Some(mode) => Ok((Some(mode), Some(player))),
            None => Err(CliError::InvalidArgument {
                arg: arg_name.to_string(),
                reason: format!("Unknown {arg_name} '{first}'"),
            }),
        },
    }
}
