/// One problem statement as extracted from a problem page.
///
/// Built once by a [`ProblemLayout`](crate::scraper::ProblemLayout) and handed
/// to the writer; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemDocument {
    pub url: Option<String>,
    pub contest: Option<Contest>,
    pub title: String,
    pub time_limit: Option<String>,
    pub memory_limit: Option<String>,
    pub body: Vec<Block>,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contest {
    pub title: String,
    pub url: Option<String>,
    pub division: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    ListItem(String),
    Code(String),
}

impl ProblemDocument {
    /// Abbreviated file stem such as `P1_2023-Candy_Cane_Feast`.
    ///
    /// Falls back to the title with spaces replaced when the contest year or
    /// problem number cannot be read.
    pub fn slug(&self) -> String {
        let words: Vec<&str> = self.title.split_whitespace().collect();
        let year = self
            .contest
            .as_ref()
            .and_then(|c| c.title.split_whitespace().nth(1))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()));
        let number = words
            .get(1)
            .and_then(|w| w.split('.').next())
            .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));

        match (year, number) {
            (Some(year), Some(number)) if words.len() > 2 => {
                format!("P{}_{}-{}", number, year, sanitize(&words[2..].join("_")))
            }
            _ => sanitize(&words.join("_")),
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}
