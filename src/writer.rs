use crate::document::{Block, ProblemDocument};
use crate::error::{OutputError, Result};
pub use crate::{log_debug, log_info};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const INVALID_NAME_CHARS: [char; 6] = ['*', '?', '"', '<', '>', '|'];
const ALLOWED_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Where a rendered document goes when the caller does not name a file.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    pub save: Option<PathBuf>,
    pub default_dir: PathBuf,
    pub default_name: String,
    pub overwrite: bool,
}

impl OutputTarget {
    pub fn resolve(&self) -> Result<PathBuf> {
        resolve_output_path(self.save.as_deref(), &self.default_dir, &self.default_name)
    }
}

/// Renders `doc` as Markdown.
pub fn render(doc: &ProblemDocument) -> String {
    let mut out = String::new();

    match &doc.url {
        Some(url) => {
            let _ = writeln!(out, "# [{}]({})", doc.title, url);
        }
        None => {
            let _ = writeln!(out, "# {}", doc.title);
        }
    }
    out.push('\n');

    if let Some(contest) = &doc.contest {
        match &contest.url {
            Some(url) => {
                let _ = writeln!(out, "**Contest:** [{}]({})", contest.title, url);
            }
            None => {
                let _ = writeln!(out, "**Contest:** {}", contest.title);
            }
        }
        out.push('\n');
    }

    let limits: Vec<String> = [
        doc.time_limit.as_ref().map(|t| format!("**Time limit:** {}", t)),
        doc.memory_limit.as_ref().map(|m| format!("**Memory limit:** {}", m)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !limits.is_empty() {
        let _ = writeln!(out, "{}\n", limits.join(" | "));
    }

    let mut blocks = doc.body.iter().peekable();
    while let Some(block) = blocks.next() {
        match block {
            Block::Heading(text) => {
                let _ = writeln!(out, "### {}\n", text);
            }
            Block::Paragraph(text) => {
                let _ = writeln!(out, "{}\n", text);
            }
            Block::ListItem(text) => {
                let _ = writeln!(out, "- {}", text);
                // a list must end with a blank line or the next paragraph joins the last item
                if !matches!(blocks.peek(), Some(Block::ListItem(_))) {
                    out.push('\n');
                }
            }
            Block::Code(text) => {
                let _ = writeln!(out, "\n```txt\n{}\n```\n", text);
            }
        }
    }
    out.push('\n');

    for (index, sample) in doc.samples.iter().enumerate() {
        let _ = writeln!(out, "## Sample {}\n", index + 1);
        let _ = writeln!(out, "**Input:**\n\n```txt\n{}\n```\n", sample.input);
        let _ = writeln!(out, "**Output:**\n\n```txt\n{}\n```\n", sample.output);
    }

    clean_markdown(&out)
}

/// Collapses runs of blank lines and trailing whitespace; ends with one newline.
pub fn clean_markdown(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;
    for line in text.lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if !(blank && previous_blank) {
            lines.push(line);
        }
        previous_blank = blank;
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut cleaned = lines.join("\n");
    cleaned.push('\n');
    cleaned
}

/// Picks the output file.
///
/// No path means `default_dir/default_name`; relative paths are taken from
/// `default_dir`; an existing directory gets `default_name` inside it. File paths need an existing parent, a `.md` or
/// `.txt` extension (`.md` is added when missing) and no shell wildcard
/// characters.
pub fn resolve_output_path(
    save: Option<&Path>,
    default_dir: &Path,
    default_name: &str,
) -> Result<PathBuf> {
    let Some(save) = save else {
        return Ok(default_dir.join(default_name));
    };
    let save = default_dir.join(save);
    let save = save.as_path();

    if save.is_dir() {
        return Ok(save.join(default_name));
    }

    let file_name = save
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| OutputError::InvalidFileName(save.display().to_string()))?;

    if file_name.contains(INVALID_NAME_CHARS) {
        return Err(OutputError::InvalidFileName(file_name).into());
    }

    let parent = save.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        if !parent.is_dir() {
            return Err(OutputError::MissingDirectory(parent.to_path_buf()).into());
        }
    }

    match save.extension().and_then(|e| e.to_str()) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            Ok(save.to_path_buf())
        }
        Some(ext) => Err(OutputError::UnsupportedExtension(ext.to_string()).into()),
        None => Ok(save.with_extension("md")),
    }
}

/// Writes `contents` to `path` in a single call.
///
/// Without `overwrite` an existing file is an error and is left untouched;
/// the file is opened create-new so a file appearing after the check is not
/// clobbered either.
pub fn write_text(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(OutputError::FileExists(path.to_path_buf()).into());
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            OutputError::FileExists(path.to_path_buf())
        } else {
            OutputError::Write {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    file.write_all(contents.as_bytes())
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    log_debug!("[writer] Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Renders `doc` and writes it to the resolved target. Returns the path written.
pub fn write_document(doc: &ProblemDocument, target: &OutputTarget) -> Result<PathBuf> {
    let path = target.resolve()?;
    write_text(&path, &render(doc), target.overwrite)?;
    log_info!("[writer] Saved '{}' to {}", doc.title, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Contest, Sample};
    use crate::error::AppError;
    use std::fs;

    fn document() -> ProblemDocument {
        ProblemDocument {
            url: Some("https://usaco.org/index.php?page=viewproblem2&cpid=1347".to_string()),
            contest: Some(Contest {
                title: "USACO 2023 December Contest, Bronze".to_string(),
                url: Some("https://usaco.org/index.php?page=dec23results".to_string()),
                division: Some("Bronze".to_string()),
            }),
            title: "Problem 1. Candy Cane Feast".to_string(),
            time_limit: Some("4s".to_string()),
            memory_limit: None,
            body: vec![
                Block::Paragraph("Cows eat **candy canes**.".to_string()),
                Block::Heading("INPUT FORMAT".to_string()),
                Block::ListItem("first".to_string()),
                Block::ListItem("second".to_string()),
            ],
            samples: vec![
                Sample {
                    input: "3 2".to_string(),
                    output: "7".to_string(),
                },
                Sample {
                    input: "1 1".to_string(),
                    output: "2".to_string(),
                },
            ],
        }
    }

    fn target(dir: &Path, save: Option<PathBuf>, overwrite: bool) -> OutputTarget {
        OutputTarget {
            save,
            default_dir: dir.to_path_buf(),
            default_name: "README.md".to_string(),
            overwrite,
        }
    }

    #[test]
    fn render_follows_template() {
        let text = render(&document());
        assert!(text.starts_with(
            "# [Problem 1. Candy Cane Feast](https://usaco.org/index.php?page=viewproblem2&cpid=1347)\n"
        ));
        assert!(text.contains("**Contest:** [USACO 2023 December Contest, Bronze]"));
        assert!(text.contains("**Time limit:** 4s\n"));
        assert!(!text.contains("Memory limit"));
        assert!(text.contains("### INPUT FORMAT\n\n- first\n- second\n"));
        assert!(text.contains("## Sample 1\n\n**Input:**\n\n```txt\n3 2\n```"));
        assert!(text.find("## Sample 1").unwrap() < text.find("## Sample 2").unwrap());
        assert!(!text.contains("\n\n\n"));
        assert!(text.ends_with("```\n"));
    }

    #[test]
    fn list_is_closed_before_next_paragraph() {
        let mut doc = document();
        doc.body = vec![
            Block::ListItem("Inputs 4-10: N is small.".to_string()),
            Block::ListItem("Inputs 11-13: No additional constraints.".to_string()),
            Block::Paragraph("Problem credits: Nick Wu".to_string()),
        ];
        let text = render(&doc);
        assert!(text.contains(
            "- Inputs 4-10: N is small.\n- Inputs 11-13: No additional constraints.\n\nProblem credits"
        ));
    }

    #[test]
    fn render_without_url_uses_plain_heading() {
        let mut doc = document();
        doc.url = None;
        assert!(render(&doc).starts_with("# Problem 1. Candy Cane Feast\n"));
    }

    #[test]
    fn writes_new_file_with_title_heading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_document(&document(), &target(dir.path(), None, false)).unwrap();

        assert_eq!(path, dir.path().join("README.md"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# [Problem 1. Candy Cane Feast]"));
    }

    #[test]
    fn existing_file_is_kept_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, b"original \x00 bytes").unwrap();

        let err = write_document(&document(), &target(dir.path(), None, false)).unwrap_err();
        assert!(matches!(err, AppError::Output(OutputError::FileExists(_))));
        assert_eq!(fs::read(&path).unwrap(), b"original \x00 bytes");
    }

    #[test]
    fn overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        write_document(&document(), &target(dir.path(), None, true)).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render(&document()));
    }

    #[test]
    fn directory_save_path_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let resolved =
            resolve_output_path(Some(dir.path()), Path::new("unused"), "README.md").unwrap();
        assert_eq!(resolved, dir.path().join("README.md"));
    }

    #[test]
    fn relative_save_path_lands_in_default_dir() {
        let dir = tempfile::tempdir().unwrap();
        let resolved =
            resolve_output_path(Some(Path::new("candy.md")), dir.path(), "README.md").unwrap();
        assert_eq!(resolved, dir.path().join("candy.md"));

        let resolved =
            resolve_output_path(Some(Path::new("candy")), dir.path(), "README.md").unwrap();
        assert_eq!(resolved, dir.path().join("candy.md"));

        fs::create_dir(dir.path().join("out")).unwrap();
        let resolved =
            resolve_output_path(Some(Path::new("out")), dir.path(), "README.md").unwrap();
        assert_eq!(resolved, dir.path().join("out").join("README.md"));
    }

    #[test]
    fn file_save_path_rules() {
        let dir = tempfile::tempdir().unwrap();
        let resolve = |path: PathBuf| {
            resolve_output_path(Some(path.as_path()), Path::new("unused"), "README.md")
        };

        assert_eq!(
            resolve(dir.path().join("candy")).unwrap(),
            dir.path().join("candy.md")
        );
        assert_eq!(
            resolve(dir.path().join("candy.txt")).unwrap(),
            dir.path().join("candy.txt")
        );
        assert!(matches!(
            resolve(dir.path().join("candy.html")),
            Err(AppError::Output(OutputError::UnsupportedExtension(_)))
        ));
        assert!(matches!(
            resolve(dir.path().join("c?ndy.md")),
            Err(AppError::Output(OutputError::InvalidFileName(_)))
        ));
        assert!(matches!(
            resolve(dir.path().join("missing").join("candy.md")),
            Err(AppError::Output(OutputError::MissingDirectory(_)))
        ));
    }

    #[test]
    fn clean_markdown_collapses_blank_runs() {
        assert_eq!(clean_markdown("\n\na  \n\n\n\nb\n\n"), "a\n\nb\n");
    }
}
