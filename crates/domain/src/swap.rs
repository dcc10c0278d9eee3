use log::debug;

use crate::{
    CreateError, DeleteError, ExerciseID, Keyed, ReadError, Reorder, ReorderList, Targets,
    UpdateError,
};

/// Entry of an ordered exercise list (template or workout session).
pub trait ListEntry: Keyed {
    fn exercise_id(&self) -> ExerciseID;
    fn targets(&self) -> Targets;
}

/// Ordered exercise list backed by the server.
#[allow(async_fn_in_trait)]
pub trait ExerciseList {
    type Entry: ListEntry + Clone;

    async fn entries(&self) -> Result<Vec<Self::Entry>, ReadError>;
    async fn add(
        &self,
        exercise_id: ExerciseID,
        order: usize,
        targets: Targets,
    ) -> Result<(), CreateError>;
    async fn update(
        &self,
        key: <Self::Entry as Keyed>::Key,
        targets: Targets,
    ) -> Result<(), UpdateError>;
    async fn remove(&self, key: <Self::Entry as Keyed>::Key) -> Result<(), DeleteError>;
}

#[derive(thiserror::Error, Debug)]
pub enum SwapError {
    #[error("exercise not found in list")]
    NotFound,
    #[error("failed to load exercises: {0}")]
    Read(ReadError),
    #[error("failed to remove exercise: {0}")]
    Remove(DeleteError),
    #[error("exercise was removed, but the replacement could not be added: {0}")]
    Add(CreateError),
    #[error("replacement was added, but is missing in the list")]
    Missing,
    #[error("replacement was added, but could not be moved into place: {0}")]
    Reorder(UpdateError),
}

/// Replaces an exercise while keeping its position and targets.
///
/// The steps are executed one after another and the first failure aborts the remaining steps.
/// Steps that already succeeded are not undone. The view's buffer is re-initialized with the
/// resulting list. A corrective reorder is committed through the buffer, so it waits for a
/// reorder of the same list that is still in flight. Returns the resulting list.
pub async fn swap_exercise<L>(
    list: &L,
    view: &ReorderList<L::Entry>,
    key: <L::Entry as Keyed>::Key,
    new_exercise_id: ExerciseID,
) -> Result<Vec<L::Entry>, SwapError>
where
    L: ExerciseList + Reorder<Key = <L::Entry as Keyed>::Key>,
{
    let entries = list.entries().await.map_err(SwapError::Read)?;
    let Some(index) = entries.iter().position(|e| e.key() == key) else {
        return Err(SwapError::NotFound);
    };
    let targets = entries[index].targets();

    list.remove(key).await.map_err(SwapError::Remove)?;
    list.add(new_exercise_id, index, targets)
        .await
        .map_err(SwapError::Add)?;

    let entries = list.entries().await.map_err(SwapError::Read)?;
    let Some(position) = entries
        .iter()
        .position(|e| e.exercise_id() == new_exercise_id)
    else {
        return Err(SwapError::Missing);
    };

    let target = index.min(entries.len() - 1);
    view.initialize(entries.clone());
    if position != target {
        debug!("moving swapped exercise from position {position} to {target}");
        let mut corrected = entries;
        let entry = corrected.remove(position);
        corrected.insert(target, entry);
        if view.apply_reorder(corrected).is_err() {
            return Err(SwapError::Missing);
        }
        view.commit(list).await.map_err(SwapError::Reorder)?;
    }

    Ok(view.items())
}
