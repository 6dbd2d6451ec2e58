/// How a freshly uploaded image should be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSampling {
    /// Generate a full mipmap chain with the default wrap and filter.
    Mipmapped,
    /// No mipmaps: clamp both axes to the edge and filter linearly.
    ClampLinear,
}

impl TextureSampling {
    /// Mipmaps are only possible when both sides are powers of two.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        if width.is_power_of_two() && height.is_power_of_two() {
            Self::Mipmapped
        } else {
            Self::ClampLinear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two_is_mipmapped() {
        assert_eq!(TextureSampling::for_dimensions(256, 1024), TextureSampling::Mipmapped);
        assert_eq!(TextureSampling::for_dimensions(1, 1), TextureSampling::Mipmapped);
    }

    #[test]
    fn test_other_sizes_clamp() {
        assert_eq!(TextureSampling::for_dimensions(300, 256), TextureSampling::ClampLinear);
        assert_eq!(TextureSampling::for_dimensions(256, 0), TextureSampling::ClampLinear);
    }
}
