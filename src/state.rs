//! Current rotation and the extents derived from it

use log::debug;

use crate::config::Rotation;
use crate::geometry::Size;
use crate::rotation::CoordinateMapper;

/// Rotation together with the logical and device extents it implies
///
/// The logical extents are always derived from the device ones, never set
/// directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformationState {
    mapper: CoordinateMapper,
    device_size: Size,
    device_physical_size: Size,
    logical_size: Size,
    logical_physical_size: Size,
}

impl TransformationState {
    /// Create state for a device of the given pixel and physical extents
    pub fn new(rotation: Rotation, device_size: Size, device_physical_size: Size) -> Self {
        let mut state = Self {
            mapper: CoordinateMapper::new(rotation),
            device_size,
            device_physical_size,
            logical_size: device_size,
            logical_physical_size: device_physical_size,
        };
        state.set_transformation(rotation);
        state
    }

    /// Store `rotation` and recompute the logical extents
    ///
    /// Recomputes even when `rotation` is unchanged.
    pub fn set_transformation(&mut self, rotation: Rotation) {
        self.mapper = CoordinateMapper::new(rotation);
        self.logical_size = self.mapper.map_size_from_device(self.device_size);
        self.logical_physical_size = self.mapper.map_size_from_device(self.device_physical_size);
        debug!(
            "Transformation set to {} degrees, logical {}x{}",
            rotation.degrees(),
            self.logical_size.width,
            self.logical_size.height
        );
    }

    /// Replace the device extents, e.g. after a mode change
    pub fn set_device_size(&mut self, device_size: Size, device_physical_size: Size) {
        self.device_size = device_size;
        self.device_physical_size = device_physical_size;
        self.set_transformation(self.rotation());
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.mapper.rotation()
    }

    /// Mapper for the current rotation
    pub fn mapper(&self) -> CoordinateMapper {
        self.mapper
    }

    /// Framebuffer extent in pixels
    pub fn device_size(&self) -> Size {
        self.device_size
    }

    /// Framebuffer physical extent
    pub fn device_physical_size(&self) -> Size {
        self.device_physical_size
    }

    /// Logical extent in pixels
    pub fn logical_size(&self) -> Size {
        self.logical_size
    }

    /// Logical physical extent, for DPI reporting
    pub fn logical_physical_size(&self) -> Size {
        self.logical_physical_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE: Size = Size::new(640, 480);
    const PHYSICAL: Size = Size::new(160, 120);

    #[test]
    fn test_quarter_turn_swaps_logical_extents() {
        let state = TransformationState::new(Rotation::Rot90, DEVICE, PHYSICAL);
        assert_eq!(state.logical_size(), Size::new(480, 640));
        assert_eq!(state.logical_physical_size(), Size::new(120, 160));
        assert_eq!(state.device_size(), DEVICE);
    }

    #[test]
    fn test_set_transformation_recomputes() {
        let mut state = TransformationState::new(Rotation::Rot270, DEVICE, PHYSICAL);
        state.set_transformation(Rotation::Rot180);
        assert_eq!(state.rotation(), Rotation::Rot180);
        assert_eq!(state.logical_size(), DEVICE);

        state.set_transformation(Rotation::Rot180);
        assert_eq!(state.logical_size(), DEVICE);
        assert_eq!(state.logical_physical_size(), PHYSICAL);
    }

    #[test]
    fn test_device_change_keeps_rotation() {
        let mut state = TransformationState::new(Rotation::Rot90, DEVICE, PHYSICAL);
        state.set_device_size(Size::new(800, 600), Size::new(200, 150));
        assert_eq!(state.rotation(), Rotation::Rot90);
        assert_eq!(state.logical_size(), Size::new(600, 800));
    }
}
