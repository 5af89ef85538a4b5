use std::{collections::HashSet, sync::OnceLock};

use log::info;

use super::{error::NetworkingError, result::NetworkingResult};
use crate::models::{
    geometry::geometry_descriptor::Geometry, material::material_descriptor::Material,
    scene::Scene,
};

static REGISTRY: OnceLock<VariantRegistry> = OnceLock::new();

/// The set of polymorphic tags the codec accepts inside a `Job`.
#[derive(Debug)]
pub struct VariantRegistry {
    tags: HashSet<&'static str>,
}

impl VariantRegistry {
    pub fn with_tags(tags: &[&'static str]) -> Self {
        Self {
            tags: tags.iter().copied().collect(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn check_scene(&self, scene: &Scene) -> NetworkingResult<()> {
        match scene.variant_tags().find(|tag| !self.contains(tag)) {
            Some(tag) => Err(NetworkingError::UnregisteredVariant(tag.to_string())),
            None => Ok(()),
        }
    }
}

/// Registers every geometry and material variant with the codec. Must run
/// once at startup before any socket I/O; later calls return the same set.
pub fn register_variants() -> &'static VariantRegistry {
    REGISTRY.get_or_init(|| {
        let tags: Vec<&'static str> = Geometry::VARIANTS
            .into_iter()
            .chain(Material::VARIANTS)
            .collect();
        info!("Registered wire variants: {:?}", tags);
        VariantRegistry::with_tags(&tags)
    })
}

pub fn registered() -> NetworkingResult<&'static VariantRegistry> {
    REGISTRY.get().ok_or(NetworkingError::NotRegistered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{geometry::sphere::Sphere, material::lambert::Lambert};
    use vector_rs::vec3::Vec3;

    #[test]
    fn registration_covers_every_variant() {
        let registry = register_variants();
        for tag in Geometry::VARIANTS.into_iter().chain(Material::VARIANTS) {
            assert!(registry.contains(tag), "{tag} missing");
        }
        assert!(std::ptr::eq(registry, registered().unwrap()));
    }

    #[test]
    fn scene_with_unknown_material_is_rejected() {
        let registry = VariantRegistry::with_tags(&["Sphere", "Phong"]);
        let mut scene = Scene::new();
        scene.add_element(Sphere::new(1.0, Vec3::ZERO, Lambert::new(Vec3::splat(1.0))));

        match registry.check_scene(&scene) {
            Err(NetworkingError::UnregisteredVariant(tag)) => assert_eq!(tag, "Lambert"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
