use serde::Deserialize;

/// How a payee rule's pattern is applied to the raw merchant text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayeeMatch {
    /// Case-insensitive prefix.
    #[default]
    Prefix,
    /// Case-insensitive substring.
    Contains,
    /// Always matches; the catch-all tail.
    Any,
}

/// Ordered canonicalization entry: the first matching rule names the payee
/// and decides whether the transaction arrives pre-approved.
#[derive(Debug, Clone, Deserialize)]
pub struct PayeeRule {
    pub pattern: String,
    #[serde(default)]
    pub match_type: PayeeMatch,
    /// Canonical display name; `None` passes the raw text through.
    pub name: Option<String>,
    #[serde(default)]
    pub trusted: bool,
}

impl PayeeRule {
    fn catch_all() -> Self {
        PayeeRule {
            pattern: String::new(),
            match_type: PayeeMatch::Any,
            name: None,
            trusted: false,
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        let pattern = self.pattern.to_lowercase();
        match self.match_type {
            PayeeMatch::Prefix => lowered.starts_with(&pattern),
            PayeeMatch::Contains => lowered.contains(&pattern),
            PayeeMatch::Any => true,
        }
    }
}

/// The canonical payee decision for one raw merchant string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayee {
    pub name: String,
    pub trusted: bool,
}

/// Ordered, immutable payee table. Construction appends a verbatim
/// catch-all tail if the rule list does not already end in one, so
/// [`PayeeTable::normalize`] is total: every merchant string, including the
/// empty string, yields a name.
pub struct PayeeTable {
    rules: Vec<PayeeRule>,
}

impl PayeeTable {
    pub fn new(mut rules: Vec<PayeeRule>) -> Self {
        if !matches!(rules.last(), Some(last) if last.match_type == PayeeMatch::Any) {
            rules.push(PayeeRule::catch_all());
        }
        Self { rules }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_payees())
    }

    /// Loads `[[payee]]` entries from a TOML rule file, in file order.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        #[derive(Deserialize)]
        struct RuleFile {
            #[serde(rename = "payee")]
            payees: Vec<PayeeRule>,
        }
        let file: RuleFile = toml::from_str(content)?;
        Ok(Self::new(file.payees))
    }

    /// First matching rule wins. Unknown merchants fall through to the
    /// catch-all and come back verbatim, untrusted.
    pub fn normalize(&self, raw: &str) -> NormalizedPayee {
        let lowered = raw.to_lowercase();
        match self.rules.iter().find(|rule| rule.matches(&lowered)) {
            Some(rule) => NormalizedPayee {
                name: rule.name.clone().unwrap_or_else(|| raw.to_string()),
                trusted: rule.trusted,
            },
            // Unreachable once constructed, but total either way.
            None => NormalizedPayee {
                name: raw.to_string(),
                trusted: false,
            },
        }
    }
}

/// The known merchants, in priority order. Only Fareway purchases arrive
/// pre-approved.
pub fn builtin_payees() -> Vec<PayeeRule> {
    fn prefix(pattern: &str, name: &str, trusted: bool) -> PayeeRule {
        PayeeRule {
            pattern: pattern.to_string(),
            match_type: PayeeMatch::Prefix,
            name: Some(name.to_string()),
            trusted,
        }
    }

    vec![
        prefix("fareway", "Fareway", true),
        prefix("hy-vee", "Hy-Vee", false),
        prefix("apple.com", "Apple", false),
        prefix("orscheln", "Orschelens", false),
        prefix("casey", "Casey's", false),
        prefix("dollar", "Dollar Store", false),
        prefix("samsclub", "Sams Club", false),
        prefix("wal-mart", "Walmart", false),
        prefix("wm super", "Walmart", false),
        prefix("menards", "Menards", false),
        prefix("microsoft", "Microsoft", false),
    ]
}
