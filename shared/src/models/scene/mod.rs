pub mod population;

use serde::{Deserialize, Serialize};

use super::{geometry::geometry_descriptor::Geometry, light::Light};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<Geometry>,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, object: impl Into<Geometry>) {
        self.objects.push(object.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Every polymorphic tag this scene carries on the wire.
    pub fn variant_tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.objects
            .iter()
            .flat_map(|object| [object.tag(), object.material().tag()])
    }
}
