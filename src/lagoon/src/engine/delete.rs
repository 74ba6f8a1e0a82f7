use super::Engine;
use crate::ops::{DeleteManyOp, DeleteOp};
use crate::{sql, Error, Result, Row};

impl Engine<'_> {
    /// Fetch first so the deleted row can be returned, then delete.
    pub(super) async fn delete(&self, op: DeleteOp) -> Result<Row> {
        let DeleteOp { table, r#where } = op;
        self.touch(&table);

        let row = self
            .find_unique_without_auto_select(&table, &r#where)
            .await?
            .ok_or_else(|| Error::record_not_found("Delete"))?;

        let stmt = sql::delete(&table, &r#where);
        self.db.run(&stmt).await?;

        Ok(row)
    }

    /// Single-statement batch delete; no nested traversal.
    pub(super) async fn delete_many(&self, op: DeleteManyOp) -> Result<u64> {
        self.touch(&op.table);
        let stmt = sql::delete_many(&op.table, op.r#where.as_ref())?;
        self.db.run(&stmt).await
    }
}
