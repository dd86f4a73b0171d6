use tracing::debug;

use crate::application::admin::resource::{Resource, ResourceError, ResourceService};
use crate::domain::tree::{Hierarchical, TreeNode, build_tree};

impl<R> ResourceService<R>
where
    R: Resource,
    R::Record: Hierarchical,
{
    /// Every live row nested under its parent.
    pub async fn tree(&self) -> Result<Vec<TreeNode<R::Record>>, ResourceError> {
        let rows = self.repo().list_all().await?;
        debug!(
            target = "application::admin::hierarchy",
            entity = R::ENTITY,
            rows = rows.len(),
            "assembling tree"
        );
        Ok(build_tree(rows))
    }
}
