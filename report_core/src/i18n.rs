//! Translation seam for user-facing strings.
//!
//! Keys are the English source strings. `%s` placeholders are filled in order.

/// Looks up user-facing text for a key.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, args: &[&str]) -> String;
}

/// Returns the key itself with `%s` placeholders interpolated.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, key: &str, args: &[&str]) -> String {
        interpolate(key, args)
    }
}

/// Replace `%s` placeholders left to right. Extra placeholders are left as is.
pub fn interpolate(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation() {
        let translator = IdentityTranslator;
        assert_eq!(
            translator.translate("Weekly Report for %s", &["Sales"]),
            "Weekly Report for Sales"
        );
        assert_eq!(translator.translate("Weekly Report", &[]), "Weekly Report");
    }

    #[test]
    fn test_missing_args_keep_placeholder() {
        assert_eq!(interpolate("%s and %s", &["a"]), "a and %s");
    }
}
