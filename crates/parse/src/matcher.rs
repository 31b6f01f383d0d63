use regex::{Captures, Regex};

use crate::error::ParseError;

/// Where a semantic field's value comes from once a pattern has matched.
#[derive(Debug, Clone)]
pub enum FieldBinding {
    /// 1-based capture-group index in the rule's pattern.
    Slot(usize),
    /// Fixed literal, used regardless of the matched text.
    Literal(&'static str),
}

/// Binding of the four semantic fields onto a rule's capture groups.
///
/// Slots may be shared between fields (some formats print the merchant once
/// and it doubles as the memo source), and `amount` may be bound to a group
/// that is allowed not to participate in the match.
#[derive(Debug, Clone)]
pub struct FieldMap {
    pub who: FieldBinding,
    pub when: FieldBinding,
    pub location: FieldBinding,
    pub amount: Option<FieldBinding>,
}

/// One known notification layout. Tables are ordered: earlier rules shadow
/// later ones for any text both would match.
#[derive(Debug, Clone)]
pub struct FormatRule {
    /// Short tag for logs.
    pub name: &'static str,
    /// Ledger account this notification channel is bound to. `None` means
    /// the caller must supply one.
    pub account_id: Option<&'static str>,
    pub pattern: &'static str,
    pub fields: FieldMap,
}

/// Raw substrings pulled out of a matched notification, soft breaks already
/// stripped. `amount` is absent for formats that omit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSet {
    pub who: String,
    pub when: String,
    pub location: String,
    pub amount: Option<String>,
}

/// Outcome of format matching: the winning rule and what it captured.
#[derive(Debug)]
pub struct FormatMatch<'a> {
    pub rule: &'a FormatRule,
    pub captures: CaptureSet,
}

/// Pairing of a rule with its precompiled pattern.
struct CompiledFormat {
    rule: FormatRule,
    regex: Regex,
}

/// Ordered, immutable format-rule table.
///
/// The first rule whose pattern matches the full text wins; later rules are
/// never consulted. Patterns are compiled once at construction and evaluated
/// in linear time, so untrusted notification bodies cannot stall matching.
pub struct FormatTable {
    formats: Vec<CompiledFormat>,
}

impl FormatTable {
    pub fn new(rules: Vec<FormatRule>) -> Result<Self, regex::Error> {
        let formats = rules
            .into_iter()
            .map(|rule| Regex::new(rule.pattern).map(|regex| CompiledFormat { rule, regex }))
            .collect::<Result<_, _>>()?;
        Ok(Self { formats })
    }

    pub fn builtin() -> Self {
        Self::new(builtin_rules()).expect("built-in format patterns compile")
    }

    /// Selects the first matching rule and extracts its capture set.
    pub fn match_text(&self, text: &str) -> Result<FormatMatch<'_>, ParseError> {
        let (format, caps) = self
            .formats
            .iter()
            .find_map(|f| f.regex.captures(text).map(|caps| (f, caps)))
            .ok_or(ParseError::NoFormatMatched)?;
        let captures = extract(&format.rule.fields, &caps)?;
        Ok(FormatMatch {
            rule: &format.rule,
            captures,
        })
    }
}

/// The known notification channels, in priority order.
pub fn builtin_rules() -> Vec<FormatRule> {
    use FieldBinding::Slot;

    vec![
        // "Card ending in 1234\non 8/5/1972, at Who's Lounge, in the amount
        // of $452.99 fumullins"
        FormatRule {
            name: "card-alert",
            account_id: Some("a90346df-e8d2-4b12-b534-3d90d15dcf5a"),
            pattern: r"(?s)(?:Account|Card) ending in (\d+).*on (\d{1,2}[/-]\d{1,2}[/-]\d{4}), at (.*), .*in the amount of (\S+)",
            fields: FieldMap {
                who: Slot(1),
                when: Slot(2),
                location: Slot(3),
                amount: Some(Slot(4)),
            },
        },
        // "Location : Who's Lounge, Madrid, IA<BR>Transaction Date :
        // 08/05/1972<BR>Purchase Amount : $452.99"; the merchant doubles as
        // the memo source.
        FormatRule {
            name: "labeled-alert",
            account_id: Some("a4fa5bab-e050-4488-970c-c4429214f89b"),
            pattern: r"(?s)Location ?: ?([^,]*).*Date ?: ?(\d{1,2}[/-]\d{1,2}[/-]\d{4}).*Amount ?: ?(\S+)",
            fields: FieldMap {
                who: Slot(1),
                when: Slot(2),
                location: Slot(1),
                amount: Some(Slot(3)),
            },
        },
        // "Pending charge for $452.99 on 08/05 13:39 EDT at Who's Lounge,
        // PERRY IA for Credit card ending in 1234."; amount is sometimes
        // omitted, and the date carries no year.
        FormatRule {
            name: "pending-charge",
            account_id: Some("f4d3a509-068e-45bc-98c5-5bdc8d9cc40a"),
            pattern: r"(?s)Pending charge (?:for (\S+) )?on (\d{1,2}[/-]\d{1,2}) .*at (.*), .*for Credit card ending in (\d+)",
            fields: FieldMap {
                who: Slot(4),
                when: Slot(2),
                location: Slot(3),
                amount: Some(Slot(1)),
            },
        },
    ]
}

fn extract(fields: &FieldMap, caps: &Captures<'_>) -> Result<CaptureSet, ParseError> {
    Ok(CaptureSet {
        who: required(caps, &fields.who, "who")?,
        when: required(caps, &fields.when, "when")?,
        location: required(caps, &fields.location, "where")?,
        amount: fields.amount.as_ref().and_then(|b| lookup(caps, b)),
    })
}

fn required(
    caps: &Captures<'_>,
    binding: &FieldBinding,
    field: &'static str,
) -> Result<String, ParseError> {
    lookup(caps, binding).ok_or(ParseError::MissingField(field))
}

fn lookup(caps: &Captures<'_>, binding: &FieldBinding) -> Option<String> {
    match binding {
        FieldBinding::Slot(i) => caps.get(*i).map(|m| strip_soft_breaks(m.as_str())),
        FieldBinding::Literal(value) => Some((*value).to_string()),
    }
}

/// Quoted-printable soft line breaks survive in some forwarded email bodies
/// and would otherwise leak into captured fields.
fn strip_soft_breaks(raw: &str) -> String {
    raw.replace("=\r\n", "").replace("=\n", "")
}
