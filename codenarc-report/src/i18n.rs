//! Localized labels for rendered reports.
//!
//! Every [`MessageKey`] resolves for every [`Locale`]: each dictionary is an
//! exhaustive `match`, so a new key cannot be added without translating it.

use std::fmt;

use crate::model::Priority;

/// Languages with a built-in dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Locale {
    #[default]
    English,
    German,
    Polish,
}

impl Locale {
    pub const ALL: [Self; 3] = [Self::English, Self::German, Self::Polish];

    /// Resolve a locale identifier such as `de`, `de-DE` or `pl_PL.UTF-8`.
    ///
    /// Only the language subtag is considered, case-insensitively. Unknown
    /// or empty identifiers fall back to [`Locale::English`].
    #[must_use]
    pub fn resolve(identifier: &str) -> Self {
        let language = identifier
            .trim()
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Self::English,
            "de" => Self::German,
            "pl" => Self::Polish,
            _ => {
                tracing::debug!(identifier, "unsupported locale, falling back to English");
                Self::default()
            }
        }
    }

    /// ISO 639-1 language code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::German => "de",
            Self::Polish => "pl",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Every user-facing string the renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    ReportTitle,
    ContentDescription,
    VersionCaption,
    GenerationTimeCaption,
    ProjectCaption,
    SummaryTitle,
    PackageSummaryTitle,
    FilesTitle,
    SourceDirectoryCaption,
    NoViolations,
    TotalFiles,
    FilesWithViolations,
    TotalViolations,
    PriorityOneViolations,
    PriorityTwoViolations,
    PriorityThreeViolations,
    PackageColumn,
    RuleNameColumn,
    PriorityColumn,
    LineColumn,
    SourceLineMessageColumn,
    PriorityHigh,
    PriorityMedium,
    PriorityLow,
    DefaultPackage,
}

impl MessageKey {
    pub const ALL: [Self; 25] = [
        Self::ReportTitle,
        Self::ContentDescription,
        Self::VersionCaption,
        Self::GenerationTimeCaption,
        Self::ProjectCaption,
        Self::SummaryTitle,
        Self::PackageSummaryTitle,
        Self::FilesTitle,
        Self::SourceDirectoryCaption,
        Self::NoViolations,
        Self::TotalFiles,
        Self::FilesWithViolations,
        Self::TotalViolations,
        Self::PriorityOneViolations,
        Self::PriorityTwoViolations,
        Self::PriorityThreeViolations,
        Self::PackageColumn,
        Self::RuleNameColumn,
        Self::PriorityColumn,
        Self::LineColumn,
        Self::SourceLineMessageColumn,
        Self::PriorityHigh,
        Self::PriorityMedium,
        Self::PriorityLow,
        Self::DefaultPackage,
    ];
}

/// Dictionary for one locale. Cheap to copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Dictionary for a locale identifier, falling back to English.
    #[must_use]
    pub fn for_identifier(identifier: &str) -> Self {
        Self::new(Locale::resolve(identifier))
    }

    #[must_use]
    pub fn locale(self) -> Locale {
        self.locale
    }

    /// Display label of a violation priority.
    #[must_use]
    pub fn priority_label(self, priority: Priority) -> &'static str {
        self.get(match priority {
            Priority::High => MessageKey::PriorityHigh,
            Priority::Medium => MessageKey::PriorityMedium,
            Priority::Low => MessageKey::PriorityLow,
        })
    }

    #[must_use]
    pub fn get(self, key: MessageKey) -> &'static str {
        match self.locale {
            Locale::English => english(key),
            Locale::German => german(key),
            Locale::Polish => polish(key),
        }
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::ReportTitle => "CodeNarc Report",
        MessageKey::ContentDescription => {
            "The following document contains the results of CodeNarc analysis"
        }
        MessageKey::VersionCaption => "CodeNarc Version",
        MessageKey::GenerationTimeCaption => "Report time",
        MessageKey::ProjectCaption => "Project",
        MessageKey::SummaryTitle => "Summary",
        MessageKey::PackageSummaryTitle => "Package Summary",
        MessageKey::FilesTitle => "Files",
        MessageKey::SourceDirectoryCaption => "Source Directory",
        MessageKey::NoViolations => "No violations found",
        MessageKey::TotalFiles => "Total Files",
        MessageKey::FilesWithViolations => "Files with Violations",
        MessageKey::TotalViolations => "Total Violations",
        MessageKey::PriorityOneViolations => "Priority 1 Violations",
        MessageKey::PriorityTwoViolations => "Priority 2 Violations",
        MessageKey::PriorityThreeViolations => "Priority 3 Violations",
        MessageKey::PackageColumn => "Package",
        MessageKey::RuleNameColumn => "Rule Name",
        MessageKey::PriorityColumn => "Priority",
        MessageKey::LineColumn => "Line",
        MessageKey::SourceLineMessageColumn => "Source Line / Message",
        MessageKey::PriorityHigh => "High",
        MessageKey::PriorityMedium => "Medium",
        MessageKey::PriorityLow => "Low",
        MessageKey::DefaultPackage => "(default package)",
    }
}

fn german(key: MessageKey) -> &'static str {
    match key {
        MessageKey::ReportTitle => "CodeNarc-Bericht",
        MessageKey::ContentDescription => {
            "Das folgende Dokument enth\u{e4}lt die Ergebnisse der CodeNarc-Analyse"
        }
        MessageKey::VersionCaption => "CodeNarc-Version",
        MessageKey::GenerationTimeCaption => "Berichtszeit",
        MessageKey::ProjectCaption => "Projekt",
        MessageKey::SummaryTitle => "Zusammenfassung",
        MessageKey::PackageSummaryTitle => "Paket\u{fc}bersicht",
        MessageKey::FilesTitle => "Dateien",
        MessageKey::SourceDirectoryCaption => "Quellverzeichnis",
        MessageKey::NoViolations => "Keine Verst\u{f6}\u{df}e gefunden",
        MessageKey::TotalFiles => "Dateien gesamt",
        MessageKey::FilesWithViolations => "Dateien mit Verst\u{f6}\u{df}en",
        MessageKey::TotalViolations => "Verst\u{f6}\u{df}e gesamt",
        MessageKey::PriorityOneViolations => "Verst\u{f6}\u{df}e mit Priorit\u{e4}t 1",
        MessageKey::PriorityTwoViolations => "Verst\u{f6}\u{df}e mit Priorit\u{e4}t 2",
        MessageKey::PriorityThreeViolations => "Verst\u{f6}\u{df}e mit Priorit\u{e4}t 3",
        MessageKey::PackageColumn => "Paket",
        MessageKey::RuleNameColumn => "Regel",
        MessageKey::PriorityColumn => "Priorit\u{e4}t",
        MessageKey::LineColumn => "Zeile",
        MessageKey::SourceLineMessageColumn => "Quellzeile / Meldung",
        MessageKey::PriorityHigh => "Hoch",
        MessageKey::PriorityMedium => "Mittel",
        MessageKey::PriorityLow => "Niedrig",
        MessageKey::DefaultPackage => "(Standardpaket)",
    }
}

fn polish(key: MessageKey) -> &'static str {
    match key {
        MessageKey::ReportTitle => "Raport CodeNarc",
        MessageKey::ContentDescription => {
            "Poni\u{17c}szy dokument zawiera wyniki analizy CodeNarc"
        }
        MessageKey::VersionCaption => "Wersja CodeNarc",
        MessageKey::GenerationTimeCaption => "Czas wygenerowania raportu",
        MessageKey::ProjectCaption => "Projekt",
        MessageKey::SummaryTitle => "Podsumowanie",
        MessageKey::PackageSummaryTitle => "Podsumowanie pakiet\u{f3}w",
        MessageKey::FilesTitle => "Pliki",
        MessageKey::SourceDirectoryCaption => "Katalog \u{17a}r\u{f3}d\u{142}owy",
        MessageKey::NoViolations => "Nie znaleziono narusze\u{144}",
        MessageKey::TotalFiles => "Liczba plik\u{f3}w",
        MessageKey::FilesWithViolations => "Pliki z naruszeniami",
        MessageKey::TotalViolations => "Liczba narusze\u{144}",
        MessageKey::PriorityOneViolations => "Naruszenia priorytetu 1",
        MessageKey::PriorityTwoViolations => "Naruszenia priorytetu 2",
        MessageKey::PriorityThreeViolations => "Naruszenia priorytetu 3",
        MessageKey::PackageColumn => "Pakiet",
        MessageKey::RuleNameColumn => "Nazwa regu\u{142}y",
        MessageKey::PriorityColumn => "Priorytet",
        MessageKey::LineColumn => "Linia",
        MessageKey::SourceLineMessageColumn => "Linia \u{17a}r\u{f3}d\u{142}owa / Komunikat",
        MessageKey::PriorityHigh => "Wysoki",
        MessageKey::PriorityMedium => "\u{15a}redni",
        MessageKey::PriorityLow => "Niski",
        MessageKey::DefaultPackage => "(pakiet domy\u{15b}lny)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_identifiers() {
        assert_eq!(Locale::resolve("en"), Locale::English);
        assert_eq!(Locale::resolve("en-US"), Locale::English);
        assert_eq!(Locale::resolve("de_DE"), Locale::German);
        assert_eq!(Locale::resolve("DE-at"), Locale::German);
        assert_eq!(Locale::resolve("pl_PL.UTF-8"), Locale::Polish);
        assert_eq!(Locale::resolve(" pl "), Locale::Polish);
    }

    #[test]
    fn test_unsupported_locale_falls_back_to_default() {
        for identifier in ["fr-FR", "", "zz", "x-klingon"] {
            assert_eq!(Locale::resolve(identifier), Locale::English, "{identifier}");
            let fallback = Messages::for_identifier(identifier);
            let default = Messages::default();
            for key in MessageKey::ALL {
                assert_eq!(fallback.get(key), default.get(key));
            }
        }
    }

    #[test]
    fn test_every_key_resolves_for_every_locale() {
        for locale in Locale::ALL {
            let messages = Messages::new(locale);
            for key in MessageKey::ALL {
                assert!(
                    !messages.get(key).trim().is_empty(),
                    "blank label for {key:?} in {locale}"
                );
            }
        }
    }

    #[test]
    fn test_all_keys_listed_once() {
        let unique: HashSet<_> = MessageKey::ALL.iter().collect();
        assert_eq!(unique.len(), MessageKey::ALL.len());
    }

    #[test]
    fn test_locales_differ() {
        let en = Messages::new(Locale::English);
        let de = Messages::new(Locale::German);
        assert_eq!(en.get(MessageKey::FilesTitle), "Files");
        assert_eq!(de.get(MessageKey::FilesTitle), "Dateien");
        assert_eq!(de.locale().code(), "de");
        assert_eq!(de.priority_label(Priority::High), "Hoch");
        assert_eq!(en.priority_label(Priority::Low), "Low");
    }
}
