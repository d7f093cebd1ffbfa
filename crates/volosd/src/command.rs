//! Positional command grammar.
//!
//! Two forms are accepted:
//! - shorthand: one token `[=+-]<digits>%` or `<digits>%`
//! - keyword: an action keyword, optionally followed by a magnitude
//!   (`<digits>` with an optional `%` suffix, default 5)

use crate::{
    backend::{MuteChange, VolumeChange},
    error::{Error, Result},
};

/// Magnitude used when a volume keyword is given without a value.
pub const DEFAULT_MAGNITUDE: u32 = 5;

/// A parsed user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Raise the volume by a percentage.
    Increase(u32),
    /// Lower the volume by a percentage.
    Decrease(u32),
    /// Set the volume to a percentage.
    Set(u32),
    /// Mute the device.
    Mute,
    /// Unmute the device.
    Unmute,
    /// Flip the mute state.
    ToggleMute,
}

/// Action keyword before its magnitude is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// `up`, `raise`, `+`.
    Increase,
    /// `down`, `lower`, `-`.
    Decrease,
    /// `set`, `=`.
    Set,
    /// `mute`, `x`.
    Mute,
    /// `unmute`, `u`.
    Unmute,
    /// `toggle-mute`, `%`.
    ToggleMute,
}

impl Action {
    /// Look up an action keyword.
    fn from_keyword(word: &str) -> Result<Self> {
        Ok(match word {
            "+" | "up" | "raise" => Self::Increase,
            "-" | "down" | "lower" => Self::Decrease,
            "=" | "set" => Self::Set,
            "x" | "mute" => Self::Mute,
            "u" | "unmute" => Self::Unmute,
            "%" | "toggle-mute" => Self::ToggleMute,
            _ => return Err(Error::invalid(format!("unknown command: {word}"))),
        })
    }

    /// Attach a magnitude; mute actions drop it.
    fn with_magnitude(self, magnitude: u32) -> Command {
        match self {
            Self::Increase => Command::Increase(magnitude),
            Self::Decrease => Command::Decrease(magnitude),
            Self::Set => Command::Set(magnitude),
            Self::Mute => Command::Mute,
            Self::Unmute => Command::Unmute,
            Self::ToggleMute => Command::ToggleMute,
        }
    }
}

/// Parse the digits of a magnitude; `token` is the user's original text.
fn parse_digits(digits: &str, token: &str) -> Result<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid(format!("invalid value: {token}")));
    }
    digits
        .parse()
        .map_err(|_| Error::invalid(format!("value out of range: {token}")))
}

/// Parse a magnitude token: digits with an optional trailing `%`.
pub fn parse_magnitude(token: &str) -> Result<u32> {
    parse_digits(token.strip_suffix('%').unwrap_or(token), token)
}

/// Parse a shorthand token such as `+5%`, `-10%`, `=50%` or `50%`.
fn parse_shorthand(token: &str) -> Result<Command> {
    let (action, rest) = match token.as_bytes().first() {
        Some(b'+') => (Action::Increase, &token[1..]),
        Some(b'-') => (Action::Decrease, &token[1..]),
        Some(b'=') => (Action::Set, &token[1..]),
        _ => (Action::Set, token),
    };
    let digits = rest
        .strip_suffix('%')
        .ok_or_else(|| Error::invalid(format!("invalid value: {token}")))?;
    Ok(action.with_magnitude(parse_digits(digits, token)?))
}

impl Command {
    /// Parse one or two positional tokens.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        match tokens {
            [token] => {
                let token = token.as_ref();
                if token.len() > 1 && token.ends_with('%') {
                    parse_shorthand(token)
                } else {
                    Ok(Action::from_keyword(token)?.with_magnitude(DEFAULT_MAGNITUDE))
                }
            }
            [keyword, value] => {
                let action = Action::from_keyword(keyword.as_ref())?;
                Ok(action.with_magnitude(parse_magnitude(value.as_ref())?))
            }
            [] => Err(Error::invalid("missing command")),
            _ => Err(Error::invalid(format!(
                "expected at most 2 arguments, got {}",
                tokens.len()
            ))),
        }
    }

    /// Whether the command changes volume rather than mute state.
    pub fn is_volume(self) -> bool {
        self.volume_change().is_some()
    }

    /// The volume mutation this command issues, if any.
    pub fn volume_change(self) -> Option<VolumeChange> {
        match self {
            Self::Increase(n) => Some(VolumeChange::Raise(n)),
            Self::Decrease(n) => Some(VolumeChange::Lower(n)),
            Self::Set(n) => Some(VolumeChange::Set(n)),
            Self::Mute | Self::Unmute | Self::ToggleMute => None,
        }
    }

    /// The mute mutation this command issues, if any.
    pub fn mute_change(self) -> Option<MuteChange> {
        match self {
            Self::Mute => Some(MuteChange::Set(true)),
            Self::Unmute => Some(MuteChange::Set(false)),
            Self::ToggleMute => Some(MuteChange::Toggle),
            Self::Increase(_) | Self::Decrease(_) | Self::Set(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &[&str]) -> Result<Command> {
        Command::parse(tokens)
    }

    #[test]
    fn shorthand_forms() {
        for d in ["0", "5", "42", "100", "150"] {
            let n: u32 = d.parse().unwrap();
            assert_eq!(parse(&[&format!("+{d}%")]).unwrap(), Command::Increase(n));
            assert_eq!(parse(&[&format!("-{d}%")]).unwrap(), Command::Decrease(n));
            assert_eq!(parse(&[&format!("={d}%")]).unwrap(), Command::Set(n));
            assert_eq!(parse(&[&format!("{d}%")]).unwrap(), Command::Set(n));
        }
    }

    #[test]
    fn keywords_default_to_five() {
        assert_eq!(parse(&["up"]).unwrap(), Command::Increase(5));
        assert_eq!(parse(&["raise"]).unwrap(), Command::Increase(5));
        assert_eq!(parse(&["+"]).unwrap(), Command::Increase(5));
        assert_eq!(parse(&["-"]).unwrap(), Command::Decrease(5));
        assert_eq!(parse(&["lower"]).unwrap(), Command::Decrease(5));
        assert_eq!(parse(&["set"]).unwrap(), Command::Set(5));
    }

    #[test]
    fn keyword_with_value() {
        assert_eq!(parse(&["down", "10"]).unwrap(), Command::Decrease(10));
        assert_eq!(parse(&["=", "50%"]).unwrap(), Command::Set(50));
        assert_eq!(parse(&["up", "0"]).unwrap(), Command::Increase(0));
    }

    #[test]
    fn mute_keywords() {
        assert_eq!(parse(&["x"]).unwrap(), Command::Mute);
        assert_eq!(parse(&["mute"]).unwrap(), Command::Mute);
        assert_eq!(parse(&["u"]).unwrap(), Command::Unmute);
        assert_eq!(parse(&["unmute"]).unwrap(), Command::Unmute);
        assert_eq!(parse(&["%"]).unwrap(), Command::ToggleMute);
        assert_eq!(parse(&["toggle-mute"]).unwrap(), Command::ToggleMute);
        assert_eq!(parse(&["mute", "20"]).unwrap(), Command::Mute);
    }

    #[test]
    fn bad_magnitudes_are_rejected() {
        for tokens in [
            &["up", "loud"][..],
            &["up", "-5"],
            &["up", "+5%"],
            &["up", "%"],
            &["up", "5.5"],
            &["+five%"],
            &["+%"],
            &["99999999999%"],
            &["5%%"],
        ] {
            assert!(
                matches!(parse(tokens), Err(Error::InvalidArguments(_))),
                "{tokens:?} should be rejected"
            );
        }
    }

    #[test]
    fn bad_shapes_are_rejected() {
        assert!(matches!(parse(&[]), Err(Error::InvalidArguments(_))));
        assert!(matches!(
            parse(&["up", "5", "6"]),
            Err(Error::InvalidArguments(_))
        ));
        assert!(matches!(parse(&["louder"]), Err(Error::InvalidArguments(_))));
        assert!(matches!(parse(&["50"]), Err(Error::InvalidArguments(_))));
        assert!(matches!(parse(&["+5"]), Err(Error::InvalidArguments(_))));
    }

    #[test]
    fn classification() {
        assert!(Command::Set(1).is_volume());
        assert!(!Command::ToggleMute.is_volume());
        assert_eq!(
            Command::Decrease(3).volume_change(),
            Some(VolumeChange::Lower(3))
        );
        assert_eq!(Command::Unmute.mute_change(), Some(MuteChange::Set(false)));
        assert_eq!(Command::Set(3).mute_change(), None);
    }
}
