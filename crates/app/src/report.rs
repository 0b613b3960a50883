use reading_assistant_core::{filter_outliers, Ranking};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

const HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
.collapsible {
  background-color: #777;
  color: white;
  cursor: pointer;
  padding: 18px;
  width: 100%;
  border: none;
  text-align: left;
  outline: none;
  font-size: 15px;
}
.active, .collapsible:hover {
  background-color: #555;
}
.collapsible:after {
  content: '\002B';
  color: white;
  font-weight: bold;
  float: right;
  margin-left: 5px;
}
.active:after {
  content: "\2212";
}
.content {
  padding: 0 18px;
  max-height: 0;
  overflow: hidden;
  transition: max-height 0.2s ease-out;
  background-color: #f1f1f1;
}
</style>
</head>
<body>
"#;

const FOOTER: &str = r#"<script>
var coll = document.getElementsByClassName("collapsible");
for (var i = 0; i < coll.length; i++) {
  coll[i].addEventListener("click", function() {
    this.classList.toggle("active");
    var content = this.nextElementSibling;
    if (content.style.maxHeight) {
      content.style.maxHeight = null;
    } else {
      content.style.maxHeight = content.scrollHeight + "px";
    }
  });
}
</script>
</body>
</html>
"#;

/// Browsable ranking report with one collapsible section per match.
pub struct HtmlReport {
    body: String,
}

impl HtmlReport {
    pub fn new(query_name: &str) -> Self {
        let mut body = String::from(HEADER);
        let _ = writeln!(body, "<h2>Rank for: {}</h2>", escape(query_name));
        Self { body }
    }

    pub fn add_divide(&mut self, text: &str) {
        let _ = writeln!(self.body, "<hr/><hr/><hr/><h1>{}</h1>", escape(text));
    }

    pub fn add_title(&mut self, text: &str) {
        let _ = writeln!(self.body, "<h3>{}</h3>", escape(text));
    }

    pub fn add_text(&mut self, text: &str) {
        let paragraphs = text
            .lines()
            .map(escape)
            .collect::<Vec<_>>()
            .join("<br><br>");
        let _ = writeln!(self.body, "<p>{paragraphs}</p>");
    }

    pub fn add_match(&mut self, name: &str, score: f64, text: &str) {
        let _ = writeln!(
            self.body,
            "<button class=\"collapsible\"> similarity found: {} (score={score:.4}) </button>\
             <div class=\"content\"><p>{}</p></div>",
            escape(name),
            escape(text)
        );
    }

    /// Adds every query unit of `rankings` with its outlier matches.
    pub fn add_rankings(&mut self, rankings: &[Ranking], scope: f64) {
        for ranking in rankings {
            self.add_title(&ranking.query_key);
            self.add_text(&ranking.raw_text);
            for hit in filter_outliers(&ranking.ranked, scope) {
                self.add_match(&hit.unit_key, hit.score, &hit.raw_text);
            }
        }
    }

    pub fn finish(mut self) -> String {
        self.body.push_str(FOOTER);
        self.body
    }

    pub fn write_to(self, path: &Path) -> io::Result<()> {
        fs::write(path, self.finish())
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_assistant_core::RankedUnit;

    fn ranking() -> Ranking {
        Ranking {
            query_key: "new.txt".to_string(),
            raw_text: "Line one.\nLine <two>.".to_string(),
            processed_text: Vec::new(),
            ranked: vec![
                RankedUnit {
                    unit_key: "close.txt".to_string(),
                    score: 9.0,
                    raw_text: "A & B".to_string(),
                },
                RankedUnit {
                    unit_key: "far.txt".to_string(),
                    score: 1.0,
                    raw_text: "far".to_string(),
                },
            ],
        }
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn report_contains_only_outlier_matches() {
        let mut report = HtmlReport::new("new.txt");
        report.add_divide("BM25 Document, >= 0 standard deviations");
        report.add_rankings(&[ranking()], 0.0);
        let html = report.finish();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Rank for: new.txt</h2>"));
        assert!(html.contains("Line one.<br><br>Line &lt;two&gt;."));
        assert!(html.contains("similarity found: close.txt (score=9.0000)"));
        assert!(html.contains("A &amp; B"));
        assert!(!html.contains("far.txt"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn report_is_written_to_disk() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("output-bm25.html");
        HtmlReport::new("new.txt").write_to(&path)?;
        assert!(fs::read_to_string(&path)?.contains("Rank for: new.txt"));
        Ok(())
    }
}
