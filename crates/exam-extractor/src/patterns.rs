//! Regex patterns and keyword tables for exam text extraction

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::Subject;

lazy_static! {
    /// "QUESTÃO 12", "Questao 12", "QUESTÃO Nº 12"
    pub static ref QUESTION_MARKER: Regex =
        Regex::new(r"(?i)\bquest(?:ão|ao)\s*(?:n\s*[º°o]\.?\s*)?(\d{1,3})\b").unwrap();

    /// "A)", "(B)", "c)" anywhere after whitespace, or "D." / "E -" at line start.
    /// Group 1 holds the letter for the parenthesized form, group 2 for the dotted form.
    pub static ref ALTERNATIVE_MARKER: Regex =
        Regex::new(r"(?m)(?:(?:^|[ \t])\(?([A-Ea-e])\)|^[ \t]*([A-E])[ \t]*[.\-–][ \t])").unwrap();

    /// "1 - A", "2) C", "03: E", "4 B"
    pub static ref ANSWER_KEY_ENTRY: Regex =
        Regex::new(r"\b(\d{1,3})\s*[-–—.:)=]?\s*([A-E])\b").unwrap();

    /// "ENEM 2022", "ENEM/2019"
    pub static ref ENEM_YEAR_ANCHOR: Regex =
        Regex::new(r"(?i)\bENEM\s*[/\-–]?\s*((?:19|20)\d{2})\b").unwrap();

    /// "2021 — Exame Nacional do Ensino Médio"
    pub static ref EXAM_NAME_YEAR_ANCHOR: Regex =
        Regex::new(r"(?i)\b((?:19|20)\d{2})\s*[-–—]?\s*exame\s+nacional").unwrap();

    /// Any standalone four-digit year
    pub static ref YEAR_CANDIDATE: Regex = Regex::new(r"\b((?:19|20)\d{2})\b").unwrap();

    /// Marks the document as an ENEM paper
    pub static ref ENEM_LAYOUT: Regex =
        Regex::new(r"(?i)\bENEM\b|exame\s+nacional\s+do\s+ensino\s+m[ée]dio").unwrap();
}

/// Subject keyword lists, tested in this order. First match wins.
///
/// Sociology and philosophy terms live under Ciências Humanas; there is no
/// separate sociology subject.
pub const SUBJECT_KEYWORDS: &[(Subject, &[&str])] = &[
    (
        Subject::Mathematics,
        &[
            "equação",
            "função",
            "porcentagem",
            "probabilidade",
            "geometria",
            "perímetro",
            "logaritmo",
            "triângulo",
            "polígono",
            "matriz",
            "juros",
            "média aritmética",
            "mediana",
            "progressão aritmética",
            "progressão geométrica",
            "trigonometria",
            "estatística",
        ],
    ),
    (
        Subject::NaturalSciences,
        &[
            "célula",
            "molécula",
            "reação química",
            "ecossistema",
            "aceleração",
            "elétron",
            "átomo",
            "dna",
            "genética",
            "fotossíntese",
            "energia cinética",
            "corrente elétrica",
            "enzima",
            "solução aquosa",
            "espécie",
        ],
    ),
    (
        Subject::HumanSciences,
        &[
            "revolução",
            "capitalismo",
            "filósofo",
            "filosofia",
            "sociologia",
            "sociólogo",
            "cidadania",
            "colonização",
            "colonial",
            "urbanização",
            "escravidão",
            "território",
            "globalização",
            "democracia",
            "império",
            "idade média",
            "geopolítica",
            "movimentos sociais",
            "desigualdade social",
        ],
    ),
    (
        Subject::Languages,
        &[
            "poema",
            "linguagem",
            "gênero textual",
            "literatura",
            "narrador",
            "verso",
            "língua",
            "metáfora",
            "variação linguística",
            "charge",
            "crônica",
            "inglês",
            "espanhol",
        ],
    ),
];

/// Competency (topic) keyword lists within each subject. First match wins.
pub const COMPETENCY_KEYWORDS: &[(Subject, &str, &[&str])] = &[
    (
        Subject::Mathematics,
        "Geometria",
        &["geometria", "triângulo", "área", "perímetro", "volume", "círculo", "polígono", "ângulo"],
    ),
    (
        Subject::Mathematics,
        "Estatística e Probabilidade",
        &["probabilidade", "média", "mediana", "moda", "estatística", "desvio padrão"],
    ),
    (
        Subject::Mathematics,
        "Funções",
        &["função", "equação", "logaritmo", "exponencial", "gráfico da função"],
    ),
    (
        Subject::Mathematics,
        "Aritmética",
        &["porcentagem", "juros", "proporção", "regra de três", "fração", "razão entre"],
    ),
    (
        Subject::NaturalSciences,
        "Biologia",
        &["célula", "dna", "genética", "ecossistema", "espécie", "fotossíntese", "enzima", "evolução"],
    ),
    (
        Subject::NaturalSciences,
        "Química",
        &["reação", "molécula", "átomo", "solução", "ácido", "elemento químico", "ligação"],
    ),
    (
        Subject::NaturalSciences,
        "Física",
        &["velocidade", "aceleração", "energia", "corrente elétrica", "força", "onda", "temperatura"],
    ),
    (
        Subject::HumanSciences,
        "História",
        &["século", "revolução", "império", "colonização", "escravidão", "idade média", "guerra", "ditadura"],
    ),
    (
        Subject::HumanSciences,
        "Geografia",
        &["território", "clima", "urbanização", "relevo", "globalização", "população", "geopolítica"],
    ),
    (
        Subject::HumanSciences,
        "Filosofia",
        &["filosofia", "filósofo", "ética", "platão", "aristóteles", "kant"],
    ),
    (
        Subject::HumanSciences,
        "Sociologia",
        &["sociologia", "sociólogo", "movimentos sociais", "desigualdade social", "cidadania"],
    ),
    (
        Subject::Languages,
        "Língua Estrangeira",
        &["inglês", "espanhol", " the ", " and ", " los ", " las "],
    ),
    (
        Subject::Languages,
        "Literatura",
        &["poema", "verso", "romance", "narrador", "literatura", "poeta", "modernismo"],
    ),
    (
        Subject::Languages,
        "Artes",
        &["pintura", "escultura", "artista", "obra de arte"],
    ),
    (
        Subject::Languages,
        "Educação Física",
        &["esporte", "educação física", "exercício físico", "dança"],
    ),
    (
        Subject::Languages,
        "Língua Portuguesa",
        &["gramática", "variação linguística", "gênero textual", "coesão", "linguagem", "norma-padrão"],
    ),
];

/// Words signalling that a question relies on a chart, table or image
pub const DATA_CUE_KEYWORDS: &[&str] = &[
    "gráfico",
    "tabela",
    "figura",
    "mapa",
    "esquema",
    "imagem",
    "infográfico",
];

/// Returns true if the lowercased text contains any keyword from the list
pub fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text_lower.contains(keyword))
}

/// Counts how many keywords from the list appear in the lowercased text
pub fn count_matches(text_lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| text_lower.contains(*keyword))
        .count()
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_marker_variants() {
        for text in ["QUESTÃO 12", "Questão 12", "QUESTAO 12", "questao nº 12", "QUESTÃO N° 12"] {
            let caps = QUESTION_MARKER.captures(text).unwrap();
            assert_eq!(&caps[1], "12", "failed on {text}");
        }
        assert!(QUESTION_MARKER.captures("questionário 12").is_none());
    }

    #[test]
    fn test_alternative_marker_forms() {
        let letters: Vec<String> = ALTERNATIVE_MARKER
            .captures_iter("A) um B) dois\n(C) três\nD. quatro\nE - cinco")
            .map(|c| {
                c.get(1)
                    .or_else(|| c.get(2))
                    .unwrap()
                    .as_str()
                    .to_string()
            })
            .collect();
        assert_eq!(letters, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_answer_key_entry_ignores_years() {
        let pairs: Vec<(String, String)> = ANSWER_KEY_ENTRY
            .captures_iter("Gabarito 2022\n1 - A\n2) C\n03: E")
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "A".to_string()),
                ("2".to_string(), "C".to_string()),
                ("03".to_string(), "E".to_string()),
            ]
        );
    }

    #[test]
    fn test_enem_layout_detection() {
        assert!(ENEM_LAYOUT.is_match("Caderno azul ENEM 2020"));
        assert!(ENEM_LAYOUT.is_match("EXAME NACIONAL DO ENSINO MÉDIO"));
        assert!(!ENEM_LAYOUT.is_match("Vestibular Fuvest"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_contains_any_and_count() {
        let text = "o gráfico e a tabela mostram";
        assert!(contains_any(text, DATA_CUE_KEYWORDS));
        assert_eq!(count_matches(text, DATA_CUE_KEYWORDS), 2);
    }
}
