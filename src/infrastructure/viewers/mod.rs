pub mod noop;
pub mod system;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::PdfViewer;
use crate::domain::models::ViewerName;

pub type ViewerBox = Box<dyn PdfViewer + Send + Sync>;

pub struct ViewerManager {}

impl ViewerManager {
    pub fn get(name: ViewerName) -> Result<ViewerBox> {
        if name == ViewerName::System {
            return Ok(Box::<system::SystemViewer>::default());
        }

        if name == ViewerName::None {
            return Ok(Box::<noop::NoopViewer>::default());
        }

        bail!(format!("No viewer implemented for {name}"))
    }
}
