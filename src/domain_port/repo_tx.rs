/// Which adapter produced a transaction; repos refuse handles from another backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxBackend {
    MySql,
    Memory,
}

#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>>;

    /// Releases the underlying storage handle. Later `begin` calls fail.
    async fn close(&self);
}

/// Dropping a transaction without committing discards its writes.
#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    fn backend(&self) -> TxBackend;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
