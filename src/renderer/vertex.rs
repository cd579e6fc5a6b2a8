//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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

/// Colors for table elements
pub mod colors {
    pub const RAIL: [f32; 4] = [0.36, 0.2, 0.09, 1.0];
    pub const CUSHION_EDGE: [f32; 4] = [0.05, 0.32, 0.16, 1.0];
    pub const FELT: [f32; 4] = [0.06, 0.45, 0.22, 1.0];
    pub const POCKET: [f32; 4] = [0.02, 0.02, 0.02, 1.0];
    pub const BALL_OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
    pub const STRIPE_BASE: [f32; 4] = [0.95, 0.95, 0.92, 1.0];
    pub const NUMBER_SPOT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CUE_STICK: [f32; 4] = [0.55, 0.35, 0.15, 1.0];
    pub const CUE_TIP: [f32; 4] = [0.2, 0.4, 0.6, 1.0];
    pub const AIM_GUIDE: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
