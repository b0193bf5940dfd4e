use crate::error::Error;

/// Parsed form of one field annotation.
///
/// An annotation is a comma-separated token list, each token either a bare
/// flag or a `name:value` pair, for example `"tag:2,explicit,optional"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub universal: bool,
    pub application: bool,
    pub explicit: bool,
    pub indefinite: bool,
    pub optional: bool,
    pub set: bool,
    pub tag: Option<u32>,
    pub default_value: Option<i64>,
    pub choice: Option<String>,
}

impl FieldOptions {
    /// Parses and validates an annotation string.
    pub fn parse(annotation: &str) -> Result<Self, Error> {
        let mut opts = FieldOptions::default();
        for token in annotation.split(',') {
            let args: Vec<&str> = token.trim().split(':').collect();
            opts.apply(&args)?;
        }
        opts.validate()?;
        Ok(opts)
    }

    fn apply(&mut self, args: &[&str]) -> Result<(), Error> {
        match args[0] {
            "" => {}
            "universal" => self.universal = flag(args)?,
            "application" => self.application = flag(args)?,
            "explicit" => self.explicit = flag(args)?,
            "indefinite" => self.indefinite = flag(args)?,
            "optional" => self.optional = flag(args)?,
            "set" => self.set = flag(args)?,
            "tag" => self.tag = Some(tag_argument(args)?),
            "default" => self.default_value = Some(integer_argument(args)?),
            "choice" => self.choice = Some(string_argument(args)?),
            name => return Err(Error::syntax(format!("invalid option: {name}"))),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), Error> {
        if self.universal && self.tag.is_none() {
            return Err(Error::syntax(
                "'tag' must be specified when 'universal' is used",
            ));
        }
        if self.application && self.tag.is_none() {
            return Err(Error::syntax(
                "'tag' must be specified when 'application' is used",
            ));
        }
        if matches!(&self.choice, Some(name) if name.is_empty()) {
            return Err(Error::syntax("'choice' cannot be empty"));
        }
        Ok(())
    }
}

fn flag(args: &[&str]) -> Result<bool, Error> {
    if args.len() > 1 {
        return Err(Error::syntax(format!(
            "option '{}' takes no argument",
            args[0]
        )));
    }
    Ok(true)
}

fn integer_argument(args: &[&str]) -> Result<i64, Error> {
    if args.len() != 2 {
        return Err(Error::syntax(format!(
            "option '{}' requires an argument",
            args[0]
        )));
    }
    args[1].parse().map_err(|_| {
        Error::syntax(format!(
            "invalid value '{}' for option '{}'",
            args[1], args[0]
        ))
    })
}

fn tag_argument(args: &[&str]) -> Result<u32, Error> {
    let value = integer_argument(args)?;
    if value < 0 {
        return Err(Error::syntax(format!("'tag' cannot be negative: {value}")));
    }
    u32::try_from(value).map_err(|_| Error::syntax(format!("'tag' is out of range: {value}")))
}

fn string_argument(args: &[&str]) -> Result<String, Error> {
    if args.len() != 2 {
        return Err(Error::syntax(format!(
            "option '{}' requires an argument",
            args[0]
        )));
    }
    Ok(args[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_annotation() {
        assert_eq!(FieldOptions::parse("").unwrap(), FieldOptions::default());
    }

    #[test]
    fn full_annotation() {
        let opts =
            FieldOptions::parse(" tag:5 , explicit, optional ,default:-3, choice:alg ").unwrap();
        assert_eq!(opts.tag, Some(5));
        assert!(opts.explicit);
        assert!(opts.optional);
        assert_eq!(opts.default_value, Some(-3));
        assert_eq!(opts.choice.as_deref(), Some("alg"));
    }

    #[test]
    fn empty_tokens_are_ignored() {
        let opts = FieldOptions::parse("optional,,set,").unwrap();
        assert!(opts.optional);
        assert!(opts.set);
    }

    #[test]
    fn class_overrides_require_tag() {
        assert!(FieldOptions::parse("universal").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("application").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("universal,tag:3").is_ok());
        assert!(FieldOptions::parse("application,tag:3").is_ok());
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!(FieldOptions::parse("frobnicate").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("tag").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("tag:x").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("tag:-1").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("optional:yes").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("choice:").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("choice:a:b").unwrap_err().is_syntax());
        assert!(FieldOptions::parse("default").unwrap_err().is_syntax());
    }
}
