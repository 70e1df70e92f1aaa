//! Schema Binding Resolver.
//!
//! Locates a compiled descriptor set (a binary `FileDescriptorSet`
//! catalogue of service/message shapes) and, when the caller knows which
//! RPC services it needs, picks the first candidate that actually declares
//! one of them.

use std::path::{Path, PathBuf};

use prost::Message;
use prost_types::FileDescriptorSet;

use canvas_domain::error::CanvasError;

/// Filenames recognised under an explicit directory option or a module's
/// default/sibling location (resolution steps b-e, spec §4.5).
const KNOWN_FILENAMES: &[&str] = &["descriptor-set.bin", "descriptors.bin", "schema.desc"];

/// How the caller wants the descriptor set resolved, mirroring the
/// resolution order of spec §4.5.
#[derive(Debug, Clone, Default)]
pub struct DescriptorOptions {
    /// (a) an explicit file path, checked first.
    pub explicit_file: Option<PathBuf>,
    /// (b) an explicit directory, searched for `KNOWN_FILENAMES`.
    pub explicit_dir: Option<PathBuf>,
    /// The module directory the compiler is currently generating for; used
    /// to derive (c) the current-module default path, (d) the sibling
    /// "common" module, and (e) the bounded-depth sibling walk.
    pub module_dir: PathBuf,
}

/// A resolved descriptor set together with the path it was read from, for
/// diagnostics and reproducible builds.
pub struct ResolvedDescriptorSet {
    pub source: PathBuf,
    pub descriptor_set: FileDescriptorSet,
}

fn candidate_paths_in(dir: &Path) -> Vec<PathBuf> {
    KNOWN_FILENAMES.iter().map(|name| dir.join(name)).collect()
}

/// Bounded-depth walk over `dir`'s siblings (resolution step e). Depth is
/// fixed at one level: the sibling directories themselves, not their
/// children, to keep resolution time bounded regardless of workspace size.
fn sibling_candidates(module_dir: &Path) -> Vec<PathBuf> {
    let Some(parent) = module_dir.parent() else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(parent) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path != module_dir)
        .flat_map(|dir| candidate_paths_in(&dir))
        .collect()
}

/// Builds the ordered candidate list per spec §4.5 resolution order
/// (a)-(e). Does not check existence; that happens during resolution so the
/// inspected-candidates list in a `NotFound` error reflects exactly what
/// was tried.
fn ordered_candidates(options: &DescriptorOptions) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(file) = &options.explicit_file {
        candidates.push(file.clone());
    }
    if let Some(dir) = &options.explicit_dir {
        candidates.extend(candidate_paths_in(dir));
    }
    candidates.extend(candidate_paths_in(&options.module_dir));
    if let Some(parent) = options.module_dir.parent() {
        candidates.extend(candidate_paths_in(&parent.join("common")));
    }
    candidates.extend(sibling_candidates(&options.module_dir));
    candidates
}

fn declares_any_service(descriptor_set: &FileDescriptorSet, required_services: &[String]) -> bool {
    if required_services.is_empty() {
        return true;
    }
    descriptor_set.file.iter().any(|file| {
        let package = file.package.clone().unwrap_or_default();
        file.service.iter().any(|service| {
            let simple = service.name.clone().unwrap_or_default();
            let qualified = if package.is_empty() { simple.clone() } else { format!("{package}.{simple}") };
            required_services.iter().any(|req| req == &simple || req == &qualified)
        })
    })
}

/// Resolves a descriptor set per spec §4.5. When `required_services` is
/// non-empty the first candidate declaring at least one of them wins;
/// otherwise the first readable candidate wins. Fails with `NotFound`
/// listing every candidate inspected.
pub fn resolve_descriptor_set(
    options: &DescriptorOptions,
    required_services: &[String],
) -> Result<ResolvedDescriptorSet, CanvasError> {
    let candidates = ordered_candidates(options);
    let mut inspected = Vec::with_capacity(candidates.len());
    let mut first_readable: Option<ResolvedDescriptorSet> = None;

    for candidate in candidates {
        inspected.push(candidate.display().to_string());
        let Ok(bytes) = std::fs::read(&candidate) else {
            continue;
        };
        let Ok(descriptor_set) = FileDescriptorSet::decode(bytes.as_slice()) else {
            continue;
        };
        if declares_any_service(&descriptor_set, required_services) {
            return Ok(ResolvedDescriptorSet { source: candidate, descriptor_set });
        }
        if first_readable.is_none() {
            first_readable = Some(ResolvedDescriptorSet { source: candidate, descriptor_set });
        }
    }

    if !required_services.is_empty() {
        if let Some(resolved) = first_readable {
            return Ok(resolved);
        }
    }

    Err(CanvasError::binding_failure(format!(
        "no descriptor set found declaring any of {required_services:?}; inspected: {inspected:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{FileDescriptorProto, ServiceDescriptorProto};
    use std::fs;

    fn write_descriptor_set(path: &Path, package: &str, services: &[&str]) {
        let descriptor_set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                package: Some(package.to_string()),
                service: services
                    .iter()
                    .map(|name| ServiceDescriptorProto { name: Some(name.to_string()), ..Default::default() })
                    .collect(),
                ..Default::default()
            }],
        };
        fs::write(path, descriptor_set.encode_to_vec()).unwrap();
    }

    #[test]
    fn explicit_file_wins_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("explicit.bin");
        write_descriptor_set(&file, "acme.v1", &["Tokenizer"]);
        let options =
            DescriptorOptions { explicit_file: Some(file.clone()), explicit_dir: None, module_dir: dir.path().to_path_buf() };
        let resolved = resolve_descriptor_set(&options, &[]).unwrap();
        assert_eq!(resolved.source, file);
    }

    #[test]
    fn picks_first_candidate_declaring_a_required_service() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = dir.path().join("ingest");
        let common_dir = dir.path().join("common");
        fs::create_dir_all(&module_dir).unwrap();
        fs::create_dir_all(&common_dir).unwrap();
        write_descriptor_set(&module_dir.join("descriptor-set.bin"), "acme.v1", &["Other"]);
        write_descriptor_set(&common_dir.join("descriptor-set.bin"), "acme.v1", &["Tokenizer"]);

        let options = DescriptorOptions { explicit_file: None, explicit_dir: None, module_dir: module_dir.clone() };
        let resolved = resolve_descriptor_set(&options, &["Tokenizer".to_string()]).unwrap();
        assert_eq!(resolved.source, common_dir.join("descriptor-set.bin"));
    }

    #[test]
    fn not_found_lists_inspected_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let options = DescriptorOptions { explicit_file: None, explicit_dir: None, module_dir: dir.path().to_path_buf() };
        let err = resolve_descriptor_set(&options, &["Missing".to_string()]).unwrap_err();
        assert!(err.to_string().contains("inspected"));
    }
}
