//! Build stages.

use crate::directive::{Directive, FromImage};

/// A single stage in a multi-stage Dockerfile: one `FROM` followed by the
/// directives applied in that stage, in order.
///
/// Stages are produced by [`DockerfileBuilder::build`](crate::DockerfileBuilder::build)
/// and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    from: FromImage,
    directives: Vec<Directive>,
}

impl Stage {
    pub(crate) fn new(from: FromImage, directives: Vec<Directive>) -> Self {
        Self { from, directives }
    }

    /// The stage's `FROM` directive.
    pub fn from_image(&self) -> &FromImage {
        &self.from
    }

    /// Directives following `FROM`, in apply order.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Stage name from `FROM ... AS <alias>`, if any. An empty alias is
    /// not rendered and is reported as `None`.
    pub fn alias(&self) -> Option<&str> {
        self.from.alias.as_deref().filter(|a| !a.is_empty())
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.directives.len() + 1);
        lines.push(self.from.render());
        lines.extend(self.directives.iter().map(Directive::render));
        lines.join("\n")
    }
}
