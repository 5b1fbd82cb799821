//! Message formatting conventions shared by every backend
//!
//! `print` joins its operands with single spaces, `println` does the same
//! and appends a line terminator, `printf` renders `format_args!`. In every
//! case the text handed to a sink is trimmed of surrounding whitespace.

use std::fmt;

/// Space-joined rendering of a list of operands, computed lazily
pub struct Spaced<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for Spaced<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, arg) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", arg)?;
        }
        Ok(())
    }
}

/// Render `args` into the final message text
pub fn render(args: fmt::Arguments<'_>) -> String {
    match args.as_str() {
        Some(s) => s.trim().to_owned(),
        None => trimmed(args.to_string()),
    }
}

/// Space-joined operands, trimmed
pub fn sprint(args: &[&dyn fmt::Display]) -> String {
    render(format_args!("{}", Spaced(args)))
}

fn trimmed(s: String) -> String {
    let trimmed = s.trim();
    if trimmed.len() == s.len() {
        s
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprint_joins_with_spaces() {
        assert_eq!(sprint(&[&"user", &42, &true]), "user 42 true");
        assert_eq!(sprint(&[]), "");
    }

    #[test]
    fn test_render_trims() {
        assert_eq!(render(format_args!("  padded\n")), "padded");
        assert_eq!(render(format_args!("{} items\n", 3)), "3 items");
        assert_eq!(render(format_args!("{}", Spaced(&[&" a", &"b "]))), "a b");
    }

    #[test]
    fn test_render_keeps_inner_whitespace() {
        assert_eq!(render(format_args!("a\n b")), "a\n b");
    }
}
