use serde::Serialize;
use std::collections::BTreeMap;
use validator::ValidationErrors;

/// One rejected request field, as reported in a 400 body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Flatten validator errors into wire violations, camelCased and in field order
    pub fn from_errors(errors: &ValidationErrors) -> Vec<Self> {
        let mut violations: Vec<Self> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let wire = camel_case(&field);
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", wire));
                    Self::new(wire.clone(), err.code.to_string(), message)
                })
            })
            .collect();

        Self::sort_by_field(&mut violations);
        violations
    }

    /// Order violations as the request fields are declared
    pub fn sort_by_field(violations: &mut [Self]) {
        violations.sort_by_key(|v| field_rank(&v.field));
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn field_rank(field: &str) -> usize {
    const ORDER: [&str; 5] = [
        "ageRange",
        "theme",
        "characterName",
        "characterTraits",
        "storyLength",
    ];
    ORDER
        .iter()
        .position(|name| *name == field)
        .unwrap_or(ORDER.len())
}

/// GET /health body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET /api/story/health body; the provider flag key is `<backend>Configured`
#[derive(Debug, Serialize)]
pub struct ServiceHealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    #[serde(flatten)]
    pub providers: BTreeMap<String, bool>,
}

impl ServiceHealthResponse {
    pub fn new(provider_name: &str, configured: bool) -> Self {
        let mut providers = BTreeMap::new();
        providers.insert(format!("{}Configured", provider_name), configured);
        Self {
            status: "ok",
            service: "story-generation",
            providers,
        }
    }
}
