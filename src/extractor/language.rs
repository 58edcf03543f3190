use whatlang::{Lang, detect};

const MIN_CONFIDENCE: f64 = 0.25;
const MIN_TEXT_CHARS: usize = 50;

/// Guess the body language as an ISO 639-1 code where one exists.
///
/// Used alongside the declared `<html lang>`; a page may declare nothing, or
/// declare something its content doesn't match.
pub fn detect_language(text: &str) -> Option<String> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return None;
    }

    let info = detect(text)?;
    if info.confidence() < MIN_CONFIDENCE {
        return None;
    }
    Some(iso_code(info.lang()))
}

fn iso_code(lang: Lang) -> String {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Rus => "ru",
        Lang::Cmn => "zh",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Ukr => "uk",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Vie => "vi",
        // whatlang's own three-letter code for everything else
        other => return other.code().to_string(),
    };
    code.to_string()
}

/// Whether a declared `lang` attribute agrees with a detected code.
/// Region subtags are ignored ("en-GB" matches "en").
pub fn declared_matches(declared: &str, detected: &str) -> bool {
    let primary = declared.split(['-', '_']).next().unwrap_or("").trim();
    !primary.is_empty() && primary.eq_ignore_ascii_case(detected)
}
