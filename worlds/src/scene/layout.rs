//! Deterministic placement of the cluster, backdrops, camera and lights.
//!
//! The cluster is a stack of horizontal rings. Ring `i` of `band_count + 1`
//! gets `floor(sin(π·i/band_count) · element_count)` elements, so density
//! falls to zero at both poles, and sits at height
//! `vertical_scale · sin(π/2 · (half − i) / half)`. This is deliberately
//! not an equal-area sampling of the sphere; the shell is denser at the
//! equator.

use glam::Vec3;
use std::f64::consts::{FRAC_PI_2, PI};

use super::node::*;
use crate::core::error::{Result, WorldsError};
use crate::core::logging::debug;
use crate::core::util::ensure_finite_positive;
use crate::runtime::stage::SceneRuntime;

pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 20.0);
pub const OMNI_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 50.0, 100.0);

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    pub element_count: u32,
    pub band_count: u32,
    pub sphere_radius: f32,
    pub vertical_scale: f32,
    pub element_size: f32,
    pub backdrop_edge: f32,
    pub backdrop_texture: Option<TextureHandle>,
}

impl LayoutParams {
    pub fn new(
        element_count: u32,
        band_count: u32,
        sphere_radius: f32,
    ) -> Self {
        Self {
            element_count,
            band_count,
            sphere_radius,
            vertical_scale: sphere_radius,
            element_size: 1.0,
            backdrop_edge: 1000.0,
            backdrop_texture: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.element_count == 0 {
            return Err(WorldsError::invalid(
                "element_count",
                "the cluster needs at least one element per full band",
            ));
        }
        if self.band_count == 0 {
            return Err(WorldsError::invalid(
                "band_count",
                "must be at least 1",
            ));
        }
        ensure_finite_positive("sphere_radius", self.sphere_radius)?;
        ensure_finite_positive("vertical_scale", self.vertical_scale)?;
        ensure_finite_positive("element_size", self.element_size)?;
        ensure_finite_positive("backdrop_edge", self.backdrop_edge)?;

        let extent = self.cluster_extent();
        if self.backdrop_edge / 2.0 <= extent {
            return Err(WorldsError::invalid(
                "backdrop_edge",
                format!(
                    "{} does not enclose a cluster reaching {} from the origin",
                    self.backdrop_edge, extent
                ),
            ));
        }

        Ok(())
    }

    /// Upper bound on how far any cluster element reaches from the origin.
    pub fn cluster_extent(&self) -> f32 {
        self.sphere_radius.max(self.vertical_scale) + self.element_size
    }

    /// Number of elements ring `band` receives. Zero at both poles.
    pub fn band_element_count(&self, band: u32) -> usize {
        let ratio = (PI * band as f64 / self.band_count as f64).sin();
        (ratio * self.element_count as f64).floor().max(0.0) as usize
    }

    pub fn generate(&self) -> Result<SceneLayout> {
        self.validate()?;

        let half = self.band_count as f64 / 2.0;
        let radius = self.sphere_radius as f64;
        let mut elements = vec![];
        let mut band_sizes = Vec::with_capacity(self.band_count as usize + 1);

        for band in 0..=self.band_count {
            let ratio = (PI * band as f64 / self.band_count as f64).sin();
            let ratio2 = (FRAC_PI_2 * ((half - band as f64) / half)).sin();
            let count = self.band_element_count(band);
            band_sizes.push(count);

            // Empty rings (the poles) add nothing and skip the angular step
            if count == 0 {
                continue;
            }

            let y = (self.vertical_scale as f64 * ratio2) as f32;

            for j in 0..count {
                let angle = (j as f64 / count as f64) * 2.0 * PI;
                let position = Vec3::new(
                    (angle.sin() * radius * ratio) as f32,
                    y,
                    (angle.cos() * radius * ratio) as f32,
                );
                elements.push(Node::new(
                    format!("element-{}-{}", band, j),
                    position,
                    Attachment::Element {
                        geometry: BoxGeometry::cube(self.element_size),
                        material: Material::default(),
                    },
                ));
            }
        }

        let mut inner =
            BackdropShell::new(self.backdrop_edge, Color::gray(0.08));
        inner.material.texture = self.backdrop_texture.clone();
        let outer = BackdropShell::new(self.backdrop_edge, Color::gray(0.04));
        let skyboxes = vec![
            Node::new("backdrop-0", Vec3::ZERO, Attachment::Backdrop(inner)),
            Node::new("backdrop-1", Vec3::ZERO, Attachment::Backdrop(outer)),
        ];

        let camera = Node::new(
            "camera",
            CAMERA_START,
            Attachment::Camera(Camera::default()),
        );

        let lights = vec![
            Node::new(
                "ambient-light",
                Vec3::ZERO,
                Attachment::Light(Light {
                    kind: LightKind::Ambient,
                    color: Color::WHITE,
                    intensity: 0.3,
                }),
            ),
            Node::new(
                "omni-light",
                OMNI_LIGHT_POSITION,
                Attachment::Light(Light {
                    kind: LightKind::Omni,
                    color: Color::WHITE,
                    intensity: 1.0,
                }),
            ),
        ];

        debug!(
            "Generated {} elements across {} bands",
            elements.len(),
            band_sizes.len()
        );

        Ok(SceneLayout {
            elements,
            skyboxes,
            camera,
            lights,
            band_sizes,
        })
    }
}

/// Shorthand for [`LayoutParams::new`] followed by [`LayoutParams::generate`].
pub fn generate(
    element_count: u32,
    band_count: u32,
    sphere_radius: f32,
) -> Result<SceneLayout> {
    LayoutParams::new(element_count, band_count, sphere_radius).generate()
}

/// Unattached nodes produced by [`LayoutParams::generate`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    pub elements: Vec<Node>,
    pub skyboxes: Vec<Node>,
    pub camera: Node,
    pub lights: Vec<Node>,
    /// Element count per ring, index `i` is ring `i` (poles included).
    pub band_sizes: Vec<usize>,
}

impl SceneLayout {
    /// Moves every node under the runtime's root and returns the handles the
    /// choreography needs.
    pub fn install<R: SceneRuntime + ?Sized>(
        self,
        runtime: &mut R,
    ) -> Result<LayoutHandles> {
        let root = runtime.root();

        let camera = runtime.add_child(self.camera, root)?;

        let lights = self
            .lights
            .into_iter()
            .map(|light| runtime.add_child(light, root))
            .collect::<Result<Vec<_>>>()?;

        let skyboxes = self
            .skyboxes
            .into_iter()
            .map(|shell| runtime.add_child(shell, root))
            .collect::<Result<Vec<_>>>()?;

        let cluster = runtime.add_child(Node::group("cluster"), root)?;
        let elements = self
            .elements
            .into_iter()
            .map(|element| runtime.add_child(element, cluster))
            .collect::<Result<Vec<_>>>()?;

        Ok(LayoutHandles {
            elements,
            skyboxes,
            camera,
            lights,
        })
    }
}

/// Non-owning handles to the installed layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutHandles {
    pub elements: Vec<NodeId>,
    pub skyboxes: Vec<NodeId>,
    pub camera: NodeId,
    pub lights: Vec<NodeId>,
}
