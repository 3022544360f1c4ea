//! Scene node types. Everything here is plain configuration for whatever
//! rendering backend consumes the scene; nothing in this crate rasterizes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Non-owning handle to a node inside a [`Scene`][super::Scene]. Only valid
/// for the scene that issued it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[derive(Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Opaque reference to a texture loaded by the host.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TextureHandle(pub String);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub double_sided: bool,
    pub texture: Option<TextureHandle>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

impl BoxGeometry {
    pub fn cube(edge: f32) -> Self {
        Self {
            width: edge,
            height: edge,
            length: edge,
        }
    }
}

/// One of the two large enclosing boxes. Always a cube, always rendered from
/// the inside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackdropShell {
    pub edge: f32,
    pub material: Material,
}

impl BackdropShell {
    pub fn new(edge: f32, color: Color) -> Self {
        Self {
            edge,
            material: Material {
                color,
                double_sided: true,
                texture: None,
            },
        }
    }

    pub fn geometry(&self) -> BoxGeometry {
        BoxGeometry::cube(self.edge)
    }

    /// Radius of the largest sphere centered at the origin that fits inside.
    pub fn inner_radius(&self) -> f32 {
        self.edge / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub far_clip: f32,
    pub vignette_intensity: f32,
    pub vignette_power: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            far_clip: 2000.0,
            vignette_intensity: 0.5,
            vignette_power: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Ambient,
    Omni,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Attachment {
    /// Plain transform node, e.g. the scene root.
    Group,
    Element {
        geometry: BoxGeometry,
        material: Material,
    },
    Backdrop(BackdropShell),
    Camera(Camera),
    Light(Light),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub attachment: Attachment,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        position: Vec3,
        attachment: Attachment,
    ) -> Self {
        Self {
            name: name.into(),
            transform: Transform::at(position),
            attachment,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Vec3::ZERO, Attachment::Group)
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.transform.rotation
    }

    pub fn backdrop(&self) -> Option<&BackdropShell> {
        match &self.attachment {
            Attachment::Backdrop(shell) => Some(shell),
            _ => None,
        }
    }

    pub fn camera(&self) -> Option<&Camera> {
        match &self.attachment {
            Attachment::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.attachment {
            Attachment::Light(light) => Some(light),
            _ => None,
        }
    }
}
