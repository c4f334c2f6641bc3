/// Display-string lookup.
///
/// The table maps stable keys to display text; `lookup` substitutes the
/// empty string for an empty or unknown key. This guards against the
/// classic catalog quirk where looking up an empty key returns catalog
/// metadata instead of nothing.

pub const MSG_CHECKPOINT: usize = 1;
pub const MSG_ARTIFACT: usize = 2;
pub const MSG_EXTRA_LIFE: usize = 3;
pub const MSG_SHIELD_RESTORED: usize = 4;
pub const MSG_SAVED: usize = 5;
pub const MSG_SAVE_FAILED: usize = 6;
pub const MSG_NO_SAVE: usize = 7;

static MESSAGES: &[(&str, &str)] = &[
    ("checkpoint_bound", "CHECKPOINT BOUND"),
    ("artifact_found", "ARTIFACT RECOVERED"),
    ("extra_life", "EXTRA LIFE"),
    ("shield_restored", "SHIELD RESTORED"),
    ("title", "V O I D S P I R E"),
    ("title_start", "ENTER - DESCEND"),
    ("title_continue", "C - CONTINUE"),
    ("title_training", "T - TRAINING MODE"),
    ("title_quit", "ESC - LEAVE"),
    ("game_over", "THE SPIRE KEEPS YOU"),
    ("game_over_retry", "ENTER - TRY AGAIN"),
    ("paused", "PAUSED"),
    ("saving", "SAVING"),
    ("loading", "LOADING"),
    ("saved", "PROGRESS SAVED"),
    ("save_failed", "SAVE FAILED"),
    ("no_save", "NO SAVE PRESENT"),
];

/// Look up a display string. Empty or unknown keys yield "", never the
/// key itself or a placeholder.
pub fn lookup(key: &str) -> &'static str {
    if key.is_empty() {
        return "";
    }
    MESSAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, text)| *text)
        .unwrap_or("")
}

/// Text for a special-message id; 0 (and anything unmapped) is silent.
pub fn special_message(id: usize) -> &'static str {
    let key = match id {
        MSG_CHECKPOINT => "checkpoint_bound",
        MSG_ARTIFACT => "artifact_found",
        MSG_EXTRA_LIFE => "extra_life",
        MSG_SHIELD_RESTORED => "shield_restored",
        MSG_SAVED => "saved",
        MSG_SAVE_FAILED => "save_failed",
        MSG_NO_SAVE => "no_save",
        _ => "",
    };
    lookup(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_yields_empty_string() {
        assert_eq!(lookup(""), "");
    }

    #[test]
    fn unknown_key_yields_empty_string_not_the_key() {
        assert_eq!(lookup("no_such_key"), "");
    }

    #[test]
    fn known_keys_resolve() {
        assert_eq!(lookup("checkpoint_bound"), "CHECKPOINT BOUND");
        assert_eq!(special_message(MSG_ARTIFACT), "ARTIFACT RECOVERED");
    }

    #[test]
    fn message_id_zero_is_silent() {
        assert_eq!(special_message(0), "");
        assert_eq!(special_message(999), "");
    }
}
