//! Asset loading boundary.
//!
//! Entities request models, textures and sprite sheets by logical path
//! (`"models/sphere"`, `"textures/sun"`) when they are built and keep the
//! opaque handles they get back. A path that cannot be resolved is fatal to
//! construction and surfaces as [`SimError::ResourceNotFound`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use glam::UVec2;

use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// A texture laid out as a grid of equally sized animation frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    pub texture: TextureHandle,
    /// Size of one frame in pixels
    pub frame_size: UVec2,
    /// Number of frames across and down
    pub grid: UVec2,
}

impl SpriteSheet {
    pub fn frame_count(&self) -> u32 {
        self.grid.x * self.grid.y
    }
}

/// Resolves logical asset paths to handles
pub trait AssetLoader {
    fn load_model(&mut self, path: &str) -> SimResult<ModelHandle>;

    fn load_texture(&mut self, path: &str) -> SimResult<TextureHandle>;

    fn load_sprite_sheet(
        &mut self,
        path: &str,
        frame_size: UVec2,
        grid: UVec2,
    ) -> SimResult<SpriteSheet> {
        if grid.x == 0 || grid.y == 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "sprite sheet {path} has an empty frame grid"
            )));
        }
        let texture = self.load_texture(path)?;
        Ok(SpriteSheet {
            texture,
            frame_size,
            grid,
        })
    }
}

/// Hands out one stable id per distinct name
#[derive(Debug, Default)]
struct HandleRegistry {
    ids: HashMap<String, u32>,
}

impl HandleRegistry {
    fn id_for(&mut self, name: &str) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(name.to_string()).or_insert(next)
    }
}

/// Geometry statistics of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshInfo {
    pub vertex_count: usize,
    pub triangle_count: usize,
}

const TEXTURE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "dds"];

/// Loads assets from a directory on disk.
///
/// Models are Wavefront OBJ files at `<root>/<path>.obj`; textures are the
/// first of `<root>/<path>.{png,jpg,jpeg,bmp,dds}` that exists. Loads are
/// cached, so requesting the same path twice yields the same handle.
pub struct FileAssetLoader {
    root: PathBuf,
    models: HandleRegistry,
    textures: HandleRegistry,
    meshes: HashMap<ModelHandle, MeshInfo>,
    texture_files: HashMap<TextureHandle, PathBuf>,
}

impl FileAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            models: HandleRegistry::default(),
            textures: HandleRegistry::default(),
            meshes: HashMap::new(),
            texture_files: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mesh(&self, handle: ModelHandle) -> Option<&MeshInfo> {
        self.meshes.get(&handle)
    }

    pub fn texture_file(&self, handle: TextureHandle) -> Option<&Path> {
        self.texture_files.get(&handle).map(PathBuf::as_path)
    }

    fn read_obj(path: &Path) -> SimResult<MeshInfo> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|e| SimError::ResourceNotFound(format!("{}: {e}", path.display())))?;

        let mut info = MeshInfo {
            vertex_count: 0,
            triangle_count: 0,
        };
        for model in models {
            info.vertex_count += model.mesh.positions.len() / 3;
            info.triangle_count += model.mesh.indices.len() / 3;
        }
        Ok(info)
    }
}

impl AssetLoader for FileAssetLoader {
    fn load_model(&mut self, path: &str) -> SimResult<ModelHandle> {
        let file = self.root.join(format!("{path}.obj"));
        let handle = ModelHandle(self.models.id_for(path));
        if self.meshes.contains_key(&handle) {
            return Ok(handle);
        }

        let info = Self::read_obj(&file)?;
        log::debug!(
            "Loaded model {path}: {} vertices, {} triangles",
            info.vertex_count,
            info.triangle_count
        );
        self.meshes.insert(handle, info);
        Ok(handle)
    }

    fn load_texture(&mut self, path: &str) -> SimResult<TextureHandle> {
        let handle = TextureHandle(self.textures.id_for(path));
        if self.texture_files.contains_key(&handle) {
            return Ok(handle);
        }

        let file = TEXTURE_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{path}.{ext}")))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| SimError::ResourceNotFound(path.to_string()))?;

        log::debug!("Loaded texture {path} from {}", file.display());
        self.texture_files.insert(handle, file);
        Ok(handle)
    }
}

/// In-memory asset registry for headless runs and tests.
///
/// A permissive registry resolves every path; a restricted one only resolves
/// the names it was created with.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    known: Option<HashSet<String>>,
    models: HandleRegistry,
    textures: HandleRegistry,
}

impl MemoryAssets {
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn with_resources<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    fn check(&self, path: &str) -> SimResult<()> {
        match &self.known {
            Some(known) if !known.contains(path) => {
                Err(SimError::ResourceNotFound(path.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl AssetLoader for MemoryAssets {
    fn load_model(&mut self, path: &str) -> SimResult<ModelHandle> {
        self.check(path)?;
        Ok(ModelHandle(self.models.id_for(path)))
    }

    fn load_texture(&mut self, path: &str) -> SimResult<TextureHandle> {
        self.check(path)?;
        Ok(TextureHandle(self.textures.id_for(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("orrery-assets-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("models")).unwrap();
        fs::create_dir_all(dir.join("textures")).unwrap();
        dir
    }

    #[test]
    fn test_memory_assets_are_stable_per_name() {
        let mut assets = MemoryAssets::permissive();
        let a = assets.load_model("models/sphere").unwrap();
        let b = assets.load_model("models/asteroid1").unwrap();
        let c = assets.load_model("models/sphere").unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);
    }

    #[test]
    fn test_restricted_memory_assets_reject_unknown_paths() {
        let mut assets = MemoryAssets::with_resources(["textures/sun"]);
        assert!(assets.load_texture("textures/sun").is_ok());
        assert_eq!(
            assets.load_texture("textures/pluto"),
            Err(SimError::ResourceNotFound("textures/pluto".to_string()))
        );
    }

    #[test]
    fn test_sprite_sheet_needs_frames() {
        let mut assets = MemoryAssets::permissive();
        let sheet = assets
            .load_sprite_sheet("textures/explosion", UVec2::new(107, 104), UVec2::new(5, 3))
            .unwrap();
        assert_eq!(sheet.frame_count(), 15);

        let empty = assets.load_sprite_sheet("textures/explosion", UVec2::ONE, UVec2::new(0, 3));
        assert!(matches!(empty, Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_file_loader_reads_obj_and_textures() {
        let dir = scratch_dir("ok");
        fs::write(
            dir.join("models/tri.obj"),
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();
        fs::write(dir.join("textures/sun.png"), [0u8; 4]).unwrap();

        let mut loader = FileAssetLoader::new(&dir);
        let model = loader.load_model("models/tri").unwrap();
        assert_eq!(
            loader.mesh(model),
            Some(&MeshInfo {
                vertex_count: 3,
                triangle_count: 1
            })
        );
        let texture = loader.load_texture("textures/sun").unwrap();
        assert_eq!(loader.texture_file(texture), Some(dir.join("textures/sun.png").as_path()));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_loader_missing_files_are_not_found() {
        let dir = scratch_dir("missing");
        let mut loader = FileAssetLoader::new(&dir);

        assert!(matches!(
            loader.load_model("models/sphere"),
            Err(SimError::ResourceNotFound(_))
        ));
        assert!(matches!(
            loader.load_texture("textures/earthmap"),
            Err(SimError::ResourceNotFound(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }
}
