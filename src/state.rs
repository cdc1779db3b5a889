use std::sync::Arc;

use crate::capture::{CameraDevice, CaptureSurface, ImageDirCamera};
use crate::config::Config;
use crate::gateway::InferenceGateway;
use crate::geocode::ReverseGeocoder;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub camera: Arc<CaptureSurface>,
    pub gateway: Arc<InferenceGateway>,
    pub geocoder: Arc<ReverseGeocoder>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let device: Arc<dyn CameraDevice> = Arc::new(ImageDirCamera::new(&config.camera_config.device_dir));
        let gateway = InferenceGateway::from_config(&config.gemini_config);
        Self::with_parts(config, device, gateway)
    }

    /// Assemble state from explicit parts
    pub fn with_parts(config: Config, device: Arc<dyn CameraDevice>, gateway: InferenceGateway) -> Self {
        let camera = Arc::new(CaptureSurface::new(device, config.camera_config.jpeg_quality));
        let geocoder = Arc::new(ReverseGeocoder::new(&config.geocode_config));
        Self {
            config,
            camera,
            gateway: Arc::new(gateway),
            geocoder,
        }
    }
}
