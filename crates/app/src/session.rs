use crate::report::HtmlReport;
use anyhow::{anyhow, bail, Context};
use reading_assistant_core::{
    filter_outliers, list_documents, source_id_for, Granularity, Ranking, RankingOptions,
    ReadingAssistant, SimilarityProvider,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const BM25_REPORT_FILE: &str = "output-bm25.html";

/// Live reading state: the in-memory collections plus the read/unread folders
/// they mirror.
pub struct Session {
    assistant: ReadingAssistant,
    unread_dir: PathBuf,
    report_dir: PathBuf,
    options: RankingOptions,
}

impl Session {
    pub fn open(
        read_dir: &Path,
        unread_dir: &Path,
        report_dir: &Path,
        options: RankingOptions,
    ) -> anyhow::Result<Self> {
        options.validate()?;
        if !unread_dir.is_dir() {
            bail!("unread folder is not a directory: {}", unread_dir.display());
        }

        let assistant = ReadingAssistant::open(read_dir, options.bm25_params()?)
            .with_context(|| format!("loading read folder {}", read_dir.display()))?;

        Ok(Self {
            assistant,
            unread_dir: unread_dir.to_path_buf(),
            report_dir: report_dir.to_path_buf(),
            options,
        })
    }

    pub fn scope(&self) -> f64 {
        self.options.scope
    }

    pub fn set_scope(&mut self, scope: f64) -> anyhow::Result<()> {
        let options = RankingOptions {
            scope,
            ..self.options
        };
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub fn read_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(list_documents(self.assistant.read_folder())?)
    }

    pub fn unread_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(list_documents(&self.unread_dir)?)
    }

    pub fn list(&self) -> anyhow::Result<String> {
        let mut out = String::from("-= READ FILES: =-\n");
        push_listing(&mut out, &self.read_files()?);
        out.push_str("=- UN-READ FILES: -=\n");
        push_listing(&mut out, &self.unread_files()?);
        Ok(out)
    }

    /// Ranks an unread file at both granularities, writes the HTML report and
    /// returns the console summary.
    pub fn rank(&self, unread_number: usize) -> anyhow::Result<RankOutcome> {
        let target = pick(&self.unread_files()?, unread_number, "unread")?;
        let rankings = self.assistant.rank_path(&target)?;
        let scope = self.options.scope;
        let method = self.assistant.name();

        let mut summary = String::new();
        summary.push_str(&format_rankings(method, Granularity::Paragraph, &rankings.paragraph, scope));
        summary.push_str(&format_rankings(method, Granularity::Document, &rankings.document, scope));

        let mut report = HtmlReport::new(&target.display().to_string());
        report.add_divide(&format!("{method} Document, >= {scope} standard deviations"));
        report.add_rankings(&rankings.document, scope);
        report.add_divide(&format!("{method} Paragraph, >= {scope} standard deviations"));
        report.add_rankings(&rankings.paragraph, scope);

        let report_path = self.report_dir.join(BM25_REPORT_FILE);
        report
            .write_to(&report_path)
            .with_context(|| format!("writing report {}", report_path.display()))?;
        info!(query = %target.display(), report = %report_path.display(), "ranking written");

        Ok(RankOutcome {
            summary,
            report_path,
            document: rankings.document,
            paragraph: rankings.paragraph,
        })
    }

    /// Moves an unread file into the read folder and indexes it.
    pub fn read(&mut self, unread_number: usize) -> anyhow::Result<PathBuf> {
        let source = pick(&self.unread_files()?, unread_number, "unread")?;
        let destination = self.assistant.read_folder().join(source_id_for(&source)?);
        if destination.exists() {
            bail!("{} already exists in the read folder", destination.display());
        }

        fs::rename(&source, &destination)
            .with_context(|| format!("moving {} to {}", source.display(), destination.display()))?;

        if let Err(error) = self.assistant.add_file(&destination) {
            if let Err(undo) = fs::rename(&destination, &source) {
                warn!(path = %destination.display(), error = %undo, "could not move file back");
            }
            return Err(error.into());
        }
        Ok(destination)
    }

    /// Removes a read file from both collections and moves it back to the
    /// unread folder.
    pub fn forget(&mut self, read_number: usize) -> anyhow::Result<PathBuf> {
        let source = pick(&self.read_files()?, read_number, "read")?;
        let source_id = source_id_for(&source)?;
        let destination = self.unread_dir.join(&source_id);
        if destination.exists() {
            bail!("{} already exists in the unread folder", destination.display());
        }

        self.assistant.forget(&source_id)?;
        if let Err(error) = fs::rename(&source, &destination) {
            if let Err(undo) = self.assistant.add_file(&source) {
                warn!(path = %source.display(), error = %undo, "could not re-index file");
            }
            return Err(anyhow::Error::new(error)
                .context(format!("moving {} to {}", source.display(), destination.display())));
        }
        Ok(destination)
    }

    pub fn view(&self, granularity: Granularity, key: &str) -> Option<String> {
        self.assistant
            .view(granularity, key)
            .map(|unit| format!("{}\n{:?}", unit.raw_text(), unit.sentences()))
    }
}

pub struct RankOutcome {
    pub summary: String,
    pub report_path: PathBuf,
    pub document: Vec<Ranking>,
    pub paragraph: Vec<Ranking>,
}

pub fn format_rankings(method: &str, granularity: Granularity, rankings: &[Ranking], scope: f64) -> String {
    let mut out = String::new();
    for ranking in rankings {
        out.push_str("---------------------\n\n");
        out.push_str(&format!("{method} {granularity} ranking of {}\n", ranking.query_key));
        for hit in filter_outliers(&ranking.ranked, scope) {
            out.push_str(&format!("   {:<23}{:50}\n", hit.score, hit.unit_key));
        }
    }
    out
}

fn push_listing(out: &mut String, files: &[PathBuf]) {
    for (number, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push_str(&format!("{number:>5} : {name}\n"));
    }
}

fn pick(files: &[PathBuf], number: usize, folder: &str) -> anyhow::Result<PathBuf> {
    files
        .get(number)
        .cloned()
        .ok_or_else(|| anyhow!("no {folder} file numbered {number} ({} available)", files.len()))
}
