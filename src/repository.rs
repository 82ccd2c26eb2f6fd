//! Contract with the persistence layer. Catalogs are seeded from `get_all_by_project`
//! and every successful commit/delete is forwarded afterwards. Only an in-memory
//! implementation lives here.

use crate::catalog::CatalogEvent;
use crate::record::{Entry, ProjectId, Record, RecordId};
use anyhow::bail;
use indexmap::IndexMap;

/// Records that belong to one project.
pub trait ProjectScoped {
    fn project_id(&self) -> ProjectId;
}

impl ProjectScoped for Entry {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

pub trait Repository<R> {
    fn create(&mut self, record: &R) -> anyhow::Result<()>;

    fn get_all_by_project(&self, project_id: ProjectId) -> anyhow::Result<Vec<R>>;

    fn update(&mut self, record: &R) -> anyhow::Result<()>;

    /// Ids are only unique within a project, so deletion is scoped too.
    fn delete(&mut self, project_id: ProjectId, id: RecordId) -> anyhow::Result<()>;
}

/// Forward a catalog mutation to the repository.
pub fn push<R, P>(repo: &mut P, event: &CatalogEvent<R>) -> anyhow::Result<()>
where
    R: Record + ProjectScoped,
    P: Repository<R> + ?Sized,
{
    match event {
        CatalogEvent::Created(r) => repo.create(r),
        CatalogEvent::Updated(r) => repo.update(r),
        CatalogEvent::Deleted(r) => repo.delete(r.project_id(), r.id()),
    }
}

/// Keeps records in memory, keyed by `(project, id)`, in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryRepository<R> {
    records: IndexMap<(ProjectId, RecordId), R>,
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl<R> MemoryRepository<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Record + ProjectScoped> Repository<R> for MemoryRepository<R> {
    fn create(&mut self, record: &R) -> anyhow::Result<()> {
        let key = (record.project_id(), record.id());
        if record.is_transient() {
            bail!("cannot create a record without an ID");
        }
        if self.records.contains_key(&key) {
            bail!("record ID {} already exists in project {}", key.1, key.0);
        }
        self.records.insert(key, record.clone());
        Ok(())
    }

    fn get_all_by_project(&self, project_id: ProjectId) -> anyhow::Result<Vec<R>> {
        Ok(self
            .records
            .iter()
            .filter(|((project, _), _)| *project == project_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn update(&mut self, record: &R) -> anyhow::Result<()> {
        let key = (record.project_id(), record.id());
        let Some(slot) = self.records.get_mut(&key) else {
            bail!("record ID {} not found in project {}", key.1, key.0);
        };
        *slot = record.clone();
        Ok(())
    }

    fn delete(&mut self, project_id: ProjectId, id: RecordId) -> anyhow::Result<()> {
        if self.records.shift_remove(&(project_id, id)).is_none() {
            bail!("record ID {id} not found in project {project_id}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryRepository, Repository, push};
    use crate::catalog::CatalogEvent;
    use crate::record::Entry;

    #[test]
    fn records_are_scoped_by_project() {
        let mut repo = MemoryRepository::new();
        repo.create(&Entry::new("map", 1, "A").with_id(1)).unwrap();
        repo.create(&Entry::new("map", 2, "B").with_id(1)).unwrap();
        repo.create(&Entry::new("map", 1, "C").with_id(2)).unwrap();

        let names: Vec<_> = repo
            .get_all_by_project(1)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);

        repo.delete(1, 1).unwrap();
        assert_eq!(repo.get_all_by_project(2).unwrap().len(), 1);
        assert!(repo.delete(1, 1).is_err());
    }

    #[test]
    fn rejects_transient_and_duplicate_creates() {
        let mut repo = MemoryRepository::new();
        assert!(repo.create(&Entry::new("map", 1, "A")).is_err());
        repo.create(&Entry::new("map", 1, "A").with_id(1)).unwrap();
        assert!(repo.create(&Entry::new("map", 1, "A").with_id(1)).is_err());
        assert!(repo.update(&Entry::new("map", 1, "A").with_id(9)).is_err());
    }

    #[test]
    fn push_forwards_each_event() {
        let mut repo = MemoryRepository::new();
        let entry = Entry::new("map", 1, "A").with_id(1);
        push(&mut repo, &CatalogEvent::Created(entry.clone())).unwrap();

        let renamed = Entry {
            name: "A2".to_string(),
            ..entry
        };
        push(&mut repo, &CatalogEvent::Updated(renamed.clone())).unwrap();
        assert_eq!(repo.get_all_by_project(1).unwrap(), vec![renamed.clone()]);

        push(&mut repo, &CatalogEvent::Deleted(renamed)).unwrap();
        assert!(repo.is_empty());
    }
}
