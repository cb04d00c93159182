//! The generation pipeline.
//!
//! [`generate`] resolves a source, prepares the output tree and drives
//! [`run_pipeline`], which streams every record through augmentation,
//! duplicate detection, text validation, the writer fan-out and the optional
//! reference tester. Per-record problems become [`Warning`]s; anything else
//! aborts the run with a [`GeneratorError`].

use std::collections::HashSet;
use std::path::PathBuf;

use crate::check::compare::{TemplateAwareComparator, TextEquivalence};
use crate::check::duplicates::{ExceptionDuplicates, IdCollisions, LicenseDuplicates};
use crate::check::text::{exception_label, license_label, validate_text};
use crate::error::{GeneratorError, GeneratorResult, SourceError, WriterError};
use crate::metadata::{FsfLibreAugmenter, MetadataAugmenter};
use crate::models::{Warning, WarningKind};
use crate::report::progress::Progress;
use crate::source::{open_provider, LicenseProvider};
use crate::tester::{LicenseTester, ReferenceDirTester};
use crate::writer::assets::write_static_assets;
use crate::writer::{LicenseFormatWriter, ListMetadata, OutputLayout};

/// Everything one run needs, already validated by the caller.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub version: Option<String>,
    pub release_date: Option<String>,
    pub test_dir: Option<PathBuf>,
    pub fsf_data: Option<PathBuf>,
    pub resources_dir: Option<PathBuf>,
}

/// Record counts and warnings of a completed run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub meta: ListMetadata,
    pub licenses: usize,
    pub deprecated: usize,
    pub exceptions: usize,
    /// Pipeline warnings first, then the source's own warnings.
    pub warnings: Vec<Warning>,
}

/// Run the full generation for `options`.
pub fn generate(options: &GeneratorOptions, progress: &mut Progress) -> GeneratorResult<GenerationReport> {
    let augmenter = match &options.fsf_data {
        Some(path) => FsfLibreAugmenter::load(path)?,
        None => FsfLibreAugmenter::empty(),
    };

    let mut provider = open_provider(&options.input)?;
    let meta = ListMetadata {
        version: options
            .version
            .clone()
            .or_else(|| provider.list_version().map(str::to_string)),
        release_date: options
            .release_date
            .clone()
            .or_else(|| provider.release_date().map(str::to_string)),
    };

    let layout = OutputLayout::new(&options.output_dir);
    layout.prepare()?;
    let mut writers = layout.writers(&meta);

    let comparator = TemplateAwareComparator::new()
        .map_err(|e| GeneratorError::Internal(format!("text comparator: {}", e)))?;
    let tester = options
        .test_dir
        .as_deref()
        .map(|dir| ReferenceDirTester::new(dir, &comparator));

    let mut report = run_pipeline(
        provider.as_mut(),
        &mut writers,
        tester.as_ref().map(|t| t as &dyn LicenseTester),
        &augmenter,
        &comparator,
        progress,
    )?;
    drop(provider);

    write_static_assets(&layout.website, options.resources_dir.as_deref())?;

    report.meta = meta;
    Ok(report)
}

/// Stream every record from `provider` to `writers` and collect warnings.
///
/// Licenses come first, then deprecated licenses (written and tested, never
/// validated or deduplicated), then exceptions. Each writer's table of
/// contents is written once all records are through.
pub fn run_pipeline(
    provider: &mut dyn LicenseProvider,
    writers: &mut [Box<dyn LicenseFormatWriter>],
    tester: Option<&dyn LicenseTester>,
    augmenter: &dyn MetadataAugmenter,
    comparator: &dyn TextEquivalence,
    progress: &mut Progress,
) -> GeneratorResult<GenerationReport> {
    let mut report = GenerationReport::default();
    let mut warnings = Vec::new();

    progress.start_pass("Licenses");
    let mut duplicates = LicenseDuplicates::new(comparator);
    for record in provider.licenses()? {
        let mut license = record?;
        augmenter.augment_license(&mut license);
        if !license.has_id() {
            continue;
        }
        progress.record(&license.id);

        warnings.extend(duplicates.check(&license.id, &license.text));
        warnings.extend(validate_text(&license.text, &license_label(&license.id)));
        fan_out(writers, &license.id, |w| w.write_license(&license, false, None))?;
        if let Some(tester) = tester {
            warnings.extend(
                tester
                    .test_license(&license)
                    .iter()
                    .map(|d| Warning::license_test_failed(&license.id, d)),
            );
        }
        report.licenses += 1;
    }
    progress.finish_pass(report.licenses, "licenses");

    progress.start_pass("Deprecated licenses");
    for record in provider.deprecated_licenses()? {
        let mut deprecated = record?;
        augmenter.augment_license(&mut deprecated.license);
        let license = &deprecated.license;
        if !license.has_id() {
            continue;
        }
        progress.record(&license.id);

        let version = Some(deprecated.deprecated_version.as_str());
        fan_out(writers, &license.id, |w| w.write_license(license, true, version))?;
        if let Some(tester) = tester {
            warnings.extend(
                tester
                    .test_license(license)
                    .iter()
                    .map(|d| Warning::license_test_failed(&license.id, d)),
            );
        }
        report.deprecated += 1;
    }
    progress.finish_pass(report.deprecated, "deprecated licenses");

    let collisions = IdCollisions::new(match collect_license_ids(provider) {
        Ok(ids) => Some(ids),
        Err(e) => {
            progress.notice(&format!(
                "Unable to list license ids, skipping the exception id check: {:#}",
                anyhow::Error::from(e)
            ));
            None
        }
    });

    progress.start_pass("Exceptions");
    let mut exception_duplicates = ExceptionDuplicates::new();
    for record in provider.exceptions()? {
        let mut exception = record?;
        augmenter.augment_exception(&mut exception);
        if !exception.has_id() {
            continue;
        }
        progress.record(&exception.id);

        warnings.extend(exception_duplicates.check(&exception.id, &exception.text));
        warnings.extend(collisions.check(&exception.id));
        warnings.extend(validate_text(&exception.text, &exception_label(&exception.id)));
        let version = exception.deprecated_version.as_deref();
        fan_out(writers, &exception.id, |w| {
            w.write_exception(&exception, exception.deprecated, version)
        })?;
        if let Some(tester) = tester {
            warnings.extend(
                tester
                    .test_exception(&exception)
                    .iter()
                    .map(|d| Warning::exception_test_failed(&exception.id, d)),
            );
        }
        report.exceptions += 1;
    }
    progress.finish_pass(report.exceptions, "exceptions");

    for writer in writers.iter_mut() {
        writer.write_toc().map_err(|source| GeneratorError::Writer {
            writer: writer.name(),
            record: "table of contents".to_string(),
            source,
        })?;
    }

    warnings.extend(
        provider
            .warnings()
            .into_iter()
            .map(|message| Warning::new(WarningKind::Source, message)),
    );
    report.warnings = warnings;
    Ok(report)
}

/// Hand one record to every writer in registration order; the first failure
/// aborts with the writer's name and the record id.
fn fan_out<F>(
    writers: &mut [Box<dyn LicenseFormatWriter>],
    record: &str,
    mut write: F,
) -> GeneratorResult<()>
where
    F: FnMut(&mut dyn LicenseFormatWriter) -> Result<(), WriterError>,
{
    for writer in writers.iter_mut() {
        write(writer.as_mut()).map_err(|source| GeneratorError::Writer {
            writer: writer.name(),
            record: record.to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Ids of every license, current and deprecated.
fn collect_license_ids(provider: &mut dyn LicenseProvider) -> Result<HashSet<String>, SourceError> {
    let mut ids = HashSet::new();
    for record in provider.licenses()? {
        let license = record?;
        if license.has_id() {
            ids.insert(license.id.trim().to_string());
        }
    }
    for record in provider.deprecated_licenses()? {
        let deprecated = record?;
        if deprecated.license.has_id() {
            ids.insert(deprecated.license.id.trim().to_string());
        }
    }
    Ok(ids)
}
