use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::ChartDrawer;

use super::BaseChart;

/// Attribute that has to be bound before a chart can render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MandatoryAttribute {
    Dimension,
    Group,
    /// Chart-type specific attribute, answered by
    /// [`ChartDrawer::has_attribute`].
    Drawer(String),
}

impl MandatoryAttribute {
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::Dimension, Self::Group]
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Dimension => "dimension",
            Self::Group => "group",
            Self::Drawer(name) => name,
        }
    }
}

impl<D: ChartDrawer> BaseChart<D> {
    #[must_use]
    pub fn mandatory_attributes(&self) -> &[MandatoryAttribute] {
        &self.config.mandatory_attributes
    }

    pub fn set_mandatory_attributes(&mut self, attributes: Vec<MandatoryAttribute>) {
        self.config.mandatory_attributes = attributes;
    }

    fn has_mandatory_attribute(&self, attribute: &MandatoryAttribute) -> bool {
        match attribute {
            MandatoryAttribute::Dimension => self.dimension.is_some(),
            MandatoryAttribute::Group => self.group.is_some(),
            MandatoryAttribute::Drawer(name) => self.drawer.has_attribute(name),
        }
    }

    /// Fails on the first attribute, in list order, that is not bound.
    pub(super) fn check_mandatory_attributes(&self) -> ChartResult<()> {
        match self
            .config
            .mandatory_attributes
            .iter()
            .find(|attribute| !self.has_mandatory_attribute(attribute))
        {
            Some(missing) => Err(ChartError::MissingMandatoryAttribute {
                attribute: missing.name().to_owned(),
                chart: self.anchor_name(),
            }),
            None => Ok(()),
        }
    }
}
