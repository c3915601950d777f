//! Filesystem content store. Each subdirectory of `<content_dir>/properties`
//! is one listing: an optional `meta.json` plus image files. Everything is
//! re-read on each call; the content tree is the single source of truth and
//! is never written by the server.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Property;
use crate::format::{coerce_num_rounded, slugify, split_paragraphs};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif"];
const VIEWER_DIRS: &[&str] = &["3d", "web3d", "qgis3d"];
const PHOTOS_SUBDIR: &str = "fotos";

pub struct ContentStore {
    base: PathBuf,
}

impl ContentStore {
    /// `content_dir` is the public content root; listings live under its
    /// `properties/` subdirectory.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            base: content_dir.into().join("properties"),
        }
    }

    /// All listings, sorted by id descending (newest codes first). A missing
    /// base directory yields an empty list.
    pub fn list_properties(&self) -> Vec<Property> {
        let entries = match fs::read_dir(&self.base) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("content base {:?} not readable: {}", self.base, e);
                return Vec::new();
            }
        };

        let mut items: Vec<Property> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let id = e.file_name().to_str()?.to_string();
                Some(self.load_property(&id, &e.path()))
            })
            .collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items
    }

    /// Detail-page lookup: exact id or slug first, then case-insensitive.
    pub fn get_by_slug_or_id(&self, q: &str) -> Option<Property> {
        let all = self.list_properties();
        let q_lower = q.to_lowercase();
        all.into_iter().find(|p| {
            p.id == q
                || p.slug == q
                || p.id.to_lowercase() == q_lower
                || p.slug.to_lowercase() == q_lower
        })
    }

    fn load_property(&self, id: &str, dir: &Path) -> Property {
        // meta.json is optional; a malformed one degrades to folder defaults.
        let meta = match fs::read_to_string(dir.join("meta.json")) {
            Ok(s) => match serde_json::from_str::<Value>(&s) {
                Ok(v) => v,
                Err(e) => {
                    warn!("listing {}: malformed meta.json: {}", id, e);
                    Value::Null
                }
            },
            Err(_) => Value::Null,
        };

        let titulo = meta_str(&meta, &["titulo"]).unwrap_or_else(|| id.to_string());
        let slug = meta_str(&meta, &["slug"]).unwrap_or_else(|| slugify(&titulo, id));

        let fotos = self.resolve_photos(id, dir, &meta);
        let viewer3d = meta_str(&meta, &["viewer3d"])
            .or_else(|| find_viewer_index(id, dir));

        Property {
            id: id.to_string(),
            slug,
            titulo,
            endereco: meta_str(&meta, &["endereco", "local", "cidade"]),
            tipo: meta_str(&meta, &["tipo"]),
            preco: meta_num(&meta, &["preco", "valor", "price"]),
            moeda: meta_str(&meta, &["moeda"]).unwrap_or_else(|| "BRL".to_string()),
            valor_comparativo: meta_num(
                &meta,
                &[
                    "valor_comparativo",
                    "preco_comparativo",
                    "preco_original",
                    "precoAntigo",
                ],
            ),
            area_m2: meta_num(&meta, &["area_m2", "area", "m2", "metragem"]),
            geo: meta.get("geo").filter(|g| !g.is_null()).cloned(),
            fotos,
            viewer3d,
            descricao: meta_paragraphs(&meta, &["descricao", "description", "detalhes"]),
            descricao_html: meta_str(&meta, &["descricao_html"]),
            diferenciais: meta_list(&meta, &["diferenciais", "features", "itens"]),
        }
    }

    /// Photo URLs: an explicit non-empty `fotos` array in the metadata wins;
    /// otherwise images are discovered in the folder root and under `fotos/`.
    fn resolve_photos(&self, id: &str, dir: &Path, meta: &Value) -> Vec<String> {
        let explicit: Vec<String> = meta
            .get("fotos")
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .map(|f| f.replace('\\', "/"))
                    .collect()
            })
            .unwrap_or_default();

        let rel = if explicit.is_empty() {
            let mut found = Vec::new();
            collect_images(dir, "", false, &mut found);
            collect_images(&dir.join(PHOTOS_SUBDIR), PHOTOS_SUBDIR, true, &mut found);
            found.sort();
            found
        } else {
            explicit
        };

        rel.into_iter()
            .map(|f| format!("/content/properties/{}/{}", id, f))
            .collect()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Relative image paths under `dir`, prefixed with `prefix`; `recurse` walks
/// nested folders (used for `fotos/`).
fn collect_images(dir: &Path, prefix: &str, recurse: bool, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        if path.is_dir() {
            if recurse {
                collect_images(&path, &rel, true, out);
            }
        } else if is_image(&path) {
            out.push(rel);
        }
    }
}

/// First `index.html` in the conventional viewer subfolders, mapped to its
/// public URL.
fn find_viewer_index(id: &str, dir: &Path) -> Option<String> {
    for sub in VIEWER_DIRS {
        if let Some(rel) = find_index_html(&dir.join(sub), sub) {
            return Some(format!("/content/properties/{}/{}", id, rel));
        }
    }
    None
}

fn find_index_html(dir: &Path, prefix: &str) -> Option<String> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if path.is_file() && name.eq_ignore_ascii_case("index.html") {
            return Some(format!("{}/{}", prefix, name));
        }
        if path.is_dir() {
            subdirs.push((path, format!("{}/{}", prefix, name)));
        }
    }
    subdirs.sort_by(|a, b| a.1.cmp(&b.1));
    for (path, rel) in subdirs {
        if let Some(found) = find_index_html(&path, &rel) {
            return Some(found);
        }
    }
    None
}

/// First non-empty string under any of `keys`.
fn meta_str(meta: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| meta.get(k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First coercible number under any of `keys` (string values rounded, as the
/// metadata files carry pt-BR numerals).
fn meta_num(meta: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|k| meta.get(k))
        .find_map(coerce_num_rounded)
}

/// Description field: a string splits into paragraphs on blank lines, an
/// array is taken as-is.
fn meta_paragraphs(meta: &Value, keys: &[&str]) -> Vec<String> {
    for k in keys {
        match meta.get(k) {
            Some(Value::String(s)) if !s.trim().is_empty() => return split_paragraphs(s),
            Some(Value::Array(a)) => {
                return a
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {}
        }
    }
    Vec::new()
}

/// Feature list: string or array of strings in the metadata.
fn meta_list(meta: &Value, keys: &[&str]) -> Vec<String> {
    for k in keys {
        match meta.get(k) {
            Some(Value::String(s)) if !s.trim().is_empty() => return vec![s.trim().to_string()],
            Some(Value::Array(a)) => {
                return a
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {}
        }
    }
    Vec::new()
}
