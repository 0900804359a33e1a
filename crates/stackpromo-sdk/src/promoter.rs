use std::path::{Path, PathBuf};

use serde::Serialize;
use stackpromo_diff::{differ_from_config, DiffEngine, DiffOutcome, TextDiffer};
use stackpromo_metadata::{ArchiveSource, CachedArchiveSource, MetadataBundle, MetadataFetcher};
use stackpromo_registry::{CurlRegistryClient, ImageResolver, RegistryClient};
use stackpromo_report::{CompareUrls, Report, ReportWriter};
use stackpromo_types::{ImageName, PromotionConfig, Side, StackPromotion};
use tracing::{error, info};

use crate::error::{SdkError, SdkResult};

/// The images a promotion request resolved to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedImages {
    pub current: ImageName,
    pub next: ImageName,
}

impl ResolvedImages {
    pub fn image(&self, side: Side) -> &ImageName {
        match side {
            Side::Current => &self.current,
            Side::Next => &self.next,
        }
    }
}

/// Result of a complete pipeline run.
#[derive(Clone, Debug, Serialize)]
pub struct PromotionOutcome {
    pub stack: String,
    pub images: ResolvedImages,
    pub output_dir: PathBuf,
    pub diff: DiffOutcome,
    pub report: Report,
}

/// Promoter built from configuration: registry and archive downloads through
/// the configured HTTP executable, differ chosen by `DIFF_EXE`.
pub type ConfiguredPromoter =
    Promoter<CurlRegistryClient, CachedArchiveSource, Box<dyn TextDiffer>>;

/// Runs the promotion pipeline: resolve both images, fetch both bundles,
/// diff them and write the report.
///
/// The run is all-or-nothing up to the diff stage: if either image cannot be
/// resolved or either bundle cannot be loaded, nothing is written. One run
/// per output directory at a time; concurrent runs into the same directory
/// race on file writes.
pub struct Promoter<C, S, D> {
    resolver: ImageResolver<C>,
    fetcher: MetadataFetcher<S>,
    engine: DiffEngine<D>,
}

impl ConfiguredPromoter {
    pub fn from_config(config: &PromotionConfig) -> SdkResult<Self> {
        let client = CurlRegistryClient::from_config(config)?;
        Ok(Self::new(
            ImageResolver::new(client, config),
            MetadataFetcher::new(CachedArchiveSource::from_config(config)),
            DiffEngine::new(differ_from_config(config)),
        ))
    }
}

impl<C, S, D> Promoter<C, S, D>
where
    C: RegistryClient,
    S: ArchiveSource,
    D: TextDiffer,
{
    pub fn new(
        resolver: ImageResolver<C>,
        fetcher: MetadataFetcher<S>,
        engine: DiffEngine<D>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            engine,
        }
    }

    /// Resolve both sides. Every failing side is logged; the first failure
    /// is returned.
    pub fn resolve(&self, request: &StackPromotion) -> SdkResult<ResolvedImages> {
        let current = self.resolve_side(request, Side::Current);
        let next = self.resolve_side(request, Side::Next);

        match (current, next) {
            (Ok(current), Ok(next)) => {
                info!(
                    stack = request.stack(),
                    cur = %current,
                    nxt = %next,
                    "resolved images"
                );
                Ok(ResolvedImages { current, next })
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    fn resolve_side(&self, request: &StackPromotion, side: Side) -> SdkResult<ImageName> {
        self.resolver
            .resolve(request.stack(), request.group(side))
            .map_err(|source| {
                error!(
                    stack = request.stack(),
                    group = request.group(side),
                    side = side.short(),
                    error = %source,
                    "image resolution failed"
                );
                SdkError::Resolve { side, source }
            })
    }

    /// Fetch both bundles. Either one missing abandons the comparison.
    pub fn fetch_bundles(
        &self,
        images: &ResolvedImages,
    ) -> SdkResult<(MetadataBundle, MetadataBundle)> {
        let loaded = Side::BOTH.map(|side| {
            let bundle = self.fetcher.fetch_or_none(images.image(side));
            if let Some(bundle) = &bundle {
                info!(side = side.short(), %bundle, "metadata loaded");
            }
            bundle
        });

        match loaded {
            [Some(current), Some(next)] => Ok((current, next)),
            loaded => {
                let sides: Vec<Side> = Side::BOTH
                    .into_iter()
                    .zip(&loaded)
                    .filter(|(_, bundle)| bundle.is_none())
                    .map(|(side, _)| side)
                    .collect();
                let missing: Vec<&str> = sides.iter().map(|s| s.short()).collect();
                error!(?missing, "missing metadata, abandoning comparison");
                Err(SdkError::MissingBundle { sides })
            }
        }
    }

    /// Fetch a single image's bundle, keeping the failure detail.
    pub fn inspect(&self, image: &ImageName) -> SdkResult<MetadataBundle> {
        Ok(self.fetcher.fetch(image)?)
    }

    /// Run the whole pipeline into `output_dir`.
    pub fn hydrate(
        &self,
        request: &StackPromotion,
        output_dir: &Path,
    ) -> SdkResult<PromotionOutcome> {
        let images = self.resolve(request)?;
        let (current, next) = self.fetch_bundles(&images)?;

        // Computed before anything is written so a bundle without source
        // commits leaves no partial report behind.
        let urls = CompareUrls::from_bundles(&current, &next)?;

        std::fs::create_dir_all(output_dir)?;
        let diff = self.engine.diff(output_dir, &current, &next)?;
        let report = ReportWriter::new(request.stack()).write(output_dir, &urls)?;

        Ok(PromotionOutcome {
            stack: request.stack().to_string(),
            images,
            output_dir: output_dir.to_path_buf(),
            diff,
            report,
        })
    }

    pub fn resolver(&self) -> &ImageResolver<C> {
        &self.resolver
    }

    pub fn fetcher(&self) -> &MetadataFetcher<S> {
        &self.fetcher
    }

    pub fn engine(&self) -> &DiffEngine<D> {
        &self.engine
    }
}
