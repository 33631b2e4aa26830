//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in surface pixels with an RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.89, 0.95, 0.99, 1.0];
    /// #4caf50, alpha animated
    pub const GOAL_FILL: [f32; 4] = [0.298, 0.686, 0.314, 1.0];
    /// #2e7d32
    pub const GOAL_RIM: [f32; 4] = [0.180, 0.490, 0.196, 1.0];
    /// #9e9e9e
    pub const METAL: [f32; 4] = [0.620, 0.620, 0.620, 1.0];
    /// #616161
    pub const METAL_SHADOW: [f32; 4] = [0.380, 0.380, 0.380, 0.35];
    /// #ff5252
    pub const MAGNET_NORTH: [f32; 4] = [1.0, 0.322, 0.322, 1.0];
    /// #42a5f5
    pub const MAGNET_SOUTH: [f32; 4] = [0.259, 0.647, 0.961, 1.0];
    pub const GLOW_NORTH: [f32; 4] = [1.0, 0.322, 0.322, 0.8];
    pub const GLOW_SOUTH: [f32; 4] = [0.259, 0.647, 0.961, 0.8];

    /// Same color with a different alpha
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    /// Component-wise lerp from `a` toward `b`
    pub fn blend(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ]
    }
}
