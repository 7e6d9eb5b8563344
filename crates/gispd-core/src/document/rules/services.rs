//! Service line-item classification into the GIS ZHKH vocabulary.

use tracing::trace;

use crate::models::config::ServiceMapping;
use crate::models::document::ServiceClassification;

struct BuiltinService {
    raw: &'static str,
    canonical: &'static str,
    individual: bool,
    additional: bool,
}

const fn service(
    raw: &'static str,
    canonical: &'static str,
    individual: bool,
    additional: bool,
) -> BuiltinService {
    BuiltinService {
        raw,
        canonical,
        individual,
        additional,
    }
}

const BUILTIN_SERVICES: [BuiltinService; 10] = [
    service("охрана", "Оплата охранных услуг", true, true),
    service("домофон", "Запирающее устройство (ЗУ)", true, true),
    service("видеодомофон", "Видеонаблюдение", true, true),
    service("холодное водоснабжение", "Холодное водоснабжение", true, false),
    service("горячее водоснабжение", "Горячее водоснабжение", true, false),
    service("водоотведение", "Водоотведение", true, false),
    service("электроэнергия", "Электроснабжение", true, false),
    service("электроэнергия на содерж. ОИ", "Электрическая энергия", false, false),
    // Double space as printed by the billing system.
    service("горячая вода на содерж.  ОИ", "Горячая вода", false, false),
    service("холодная вода на содерж. ОИ", "Холодная вода", false, false),
];

/// Description with any parenthetical tail removed.
///
/// `"горячее водоснабжение (подогрев)"` becomes `"горячее водоснабжение"`;
/// a description that starts with ` (` is kept whole.
pub fn simple_name(raw: &str) -> &str {
    let name = match raw.find(" (") {
        Some(pos) if pos > 0 => &raw[..pos],
        _ => raw,
    };
    name.trim()
}

/// Maps payment document descriptions to canonical services.
///
/// The built-in table is consulted first, then configured mappings in order.
#[derive(Debug, Clone, Default)]
pub struct ServiceClassifier {
    extra: Vec<ServiceMapping>,
}

impl ServiceClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add mappings consulted after the built-in table.
    pub fn with_mappings(mut self, mappings: impl IntoIterator<Item = ServiceMapping>) -> Self {
        self.extra.extend(mappings);
        self
    }

    /// Classify a raw description. `None` when no mapping matches.
    pub fn classify(&self, raw: &str) -> Option<ServiceClassification> {
        let name = simple_name(raw);

        let builtin = BUILTIN_SERVICES
            .iter()
            .find(|s| s.raw == name)
            .map(|s| ServiceClassification {
                canonical_name: s.canonical.to_string(),
                individual: s.individual,
                additional: s.additional,
            });

        let result = builtin.or_else(|| {
            self.extra
                .iter()
                .find(|m| m.raw == name)
                .map(|m| ServiceClassification {
                    canonical_name: m.canonical.clone(),
                    individual: m.individual,
                    additional: m.additional,
                })
        });

        trace!("Classified '{}' as {:?}", raw, result);
        result
    }
}
