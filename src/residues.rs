//! Mapping sequential residue positions back to PDB residue numbers.
//!
//! Energy tables often number residues 1..N per chain, ignoring the author
//! numbering and insertion codes of the structure they were computed on. The
//! [`ResidueMap`] recovers the original identifiers from the structure itself.

use crate::error::{DdgError, Result};
use pdbtbx::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Open a PDB or mmCIF file with [`pdbtbx`] and keep every residue.
///
/// Parsing warnings are returned alongside the structure; a file that cannot
/// be parsed at all becomes [`DdgError::Structure`].
pub fn load_structure(input_file: &Path) -> Result<(PDB, Vec<PDBError>)> {
    let path = input_file.to_str().ok_or_else(|| DdgError::Structure {
        path: input_file.to_path_buf(),
        message: String::from("path is not valid UTF-8"),
    })?;

    pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(path)
        .map_err(|errors| DdgError::Structure {
            path: input_file.to_path_buf(),
            message: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        })
}

/// Residue properties needed to rebuild the original numbering.
pub trait ResidueExt {
    /// Whether the residue comes from `HETATM` records (ligands, ions and water).
    fn is_hetero(&self) -> bool;

    /// Author residue number followed by the insertion code, e.g. `"52"` or `"52A"`.
    fn original_id(&self) -> String;
}

impl ResidueExt for Residue {
    fn is_hetero(&self) -> bool {
        self.atoms().next().is_some_and(|atom| atom.hetero())
    }

    fn original_id(&self) -> String {
        let (serial, insertion) = self.id();
        format!("{serial}{}", insertion.unwrap_or("").trim())
    }
}

/// Per-chain list of original residue identifiers, indexed by 1-based sequential position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueMap {
    chains: BTreeMap<String, Vec<String>>,
}

impl ResidueMap {
    /// Build the map from the first model of a structure. Heteroatom residues
    /// are skipped and do not consume a position.
    pub fn from_pdb(pdb: &PDB) -> Self {
        let mut chains: BTreeMap<String, Vec<String>> = BTreeMap::new();
        if let Some(model) = pdb.models().next() {
            for chain in model.chains() {
                let ids = chains.entry(chain.id().to_string()).or_default();
                ids.extend(
                    chain
                        .residues()
                        .filter(|res| !res.is_hetero())
                        .map(|res| res.original_id()),
                );
            }
        }
        Self { chains }
    }

    /// Build the map from explicit per-chain identifier lists.
    pub fn from_chains<I, C, R>(chains: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<R>)>,
        C: Into<String>,
        R: Into<String>,
    {
        Self {
            chains: chains
                .into_iter()
                .map(|(c, ids)| (c.into(), ids.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Original residue identifier of the `pos`-th (1-based) residue of `chain`.
    ///
    /// Unknown chains and positions outside `1..=len` have no mapping.
    pub fn original(&self, chain: &str, pos: i64) -> Option<&str> {
        let ids = self.chains.get(chain)?;
        let idx = usize::try_from(pos).ok()?.checked_sub(1)?;
        ids.get(idx).map(String::as_str)
    }

    /// Number of mapped residues in `chain`.
    pub fn chain_len(&self, chain: &str) -> usize {
        self.chains.get(chain).map_or(0, Vec::len)
    }

    /// Chain identifiers in the map.
    pub fn chain_ids(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_structure() -> std::path::PathBuf {
        let root = env!("CARGO_MANIFEST_DIR");
        Path::new(root).join("test-data/renumbered.pdb")
    }

    #[test]
    fn insertion_codes_are_kept() {
        let map = ResidueMap::from_chains([("A", vec!["5", "6", "6A"])]);
        assert_eq!(map.original("A", 1), Some("5"));
        assert_eq!(map.original("A", 3), Some("6A"));
        assert_eq!(map.original("A", 4), None);
        assert_eq!(map.original("A", 0), None);
        assert_eq!(map.original("A", -1), None);
        assert_eq!(map.original("Z", 1), None);
    }

    #[test]
    fn map_from_structure_skips_hetero_residues() {
        let (pdb, _) = load_structure(&test_structure()).unwrap();
        let map = ResidueMap::from_pdb(&pdb);

        assert_eq!(map.chain_ids().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(map.chain_len("A"), 3);
        assert_eq!(map.original("A", 1), Some("5"));
        assert_eq!(map.original("A", 2), Some("6"));
        assert_eq!(map.original("A", 3), Some("6A"));
        assert_eq!(map.original("A", 4), None);

        // The ligand between the two chain B residues does not take a position
        assert_eq!(map.chain_len("B"), 2);
        assert_eq!(map.original("B", 2), Some("101"));
    }

    #[test]
    fn missing_structure_is_an_error() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/missing.pdb");
        assert!(matches!(
            load_structure(&path),
            Err(DdgError::Structure { .. })
        ));
    }
}
