//! Bounded breadth-first search used to validate brigade moves.

use std::collections::VecDeque;

use firebreak_core::Position;

/// Length of the shortest orthogonal path from `start` to `goal`.
///
/// Paths may only pass through cells accepted by `is_passable`; the start
/// cell itself is always accepted. The search never expands beyond `limit`
/// steps and returns `None` when the goal is unreachable within it.
pub(crate) fn shortest_path_length<F>(
    rows: u32,
    columns: u32,
    start: Position,
    goal: Position,
    limit: u32,
    mut is_passable: F,
) -> Option<u32>
where
    F: FnMut(Position) -> bool,
{
    let width = usize::try_from(columns).ok()?;
    let cell_count = width.checked_mul(usize::try_from(rows).ok()?)?;
    if cell_count == 0 || !start.is_within(rows, columns) || !goal.is_within(rows, columns) {
        return None;
    }

    let mut distances = vec![u32::MAX; cell_count];
    distances[index(width, start)?] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let current_distance = distances[index(width, cell)?];
        if cell == goal {
            return Some(current_distance);
        }

        if current_distance >= limit {
            continue;
        }

        for neighbour in cell.orthogonal_neighbours(rows, columns) {
            let Some(neighbour_index) = index(width, neighbour) else {
                continue;
            };

            if distances[neighbour_index] != u32::MAX || !is_passable(neighbour) {
                continue;
            }

            distances[neighbour_index] = current_distance + 1;
            queue.push_back(neighbour);
        }
    }

    None
}

fn index(width: usize, cell: Position) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ground_reaches_two_steps() {
        let start = Position::new(2, 2);
        assert_eq!(
            shortest_path_length(5, 5, start, Position::new(2, 4), 2, |_| true),
            Some(2)
        );
        assert_eq!(
            shortest_path_length(5, 5, start, Position::new(3, 3), 2, |_| true),
            Some(2)
        );
    }

    #[test]
    fn straight_three_cell_path_exceeds_limit() {
        assert_eq!(
            shortest_path_length(5, 5, Position::new(0, 1), Position::new(3, 1), 2, |_| true),
            None
        );
    }

    #[test]
    fn blocked_cells_force_detours() {
        let wall = Position::new(2, 3);
        let start = Position::new(2, 2);
        let goal = Position::new(2, 4);

        assert_eq!(
            shortest_path_length(5, 5, start, goal, 2, |cell| cell != wall),
            None
        );
        assert_eq!(
            shortest_path_length(5, 5, start, goal, 4, |cell| cell != wall),
            Some(4)
        );
    }

    #[test]
    fn diagonal_corner_cannot_be_cut() {
        let start = Position::new(1, 1);
        let goal = Position::new(2, 2);
        let blocked = [Position::new(1, 2), Position::new(2, 1)];

        assert_eq!(
            shortest_path_length(5, 5, start, goal, 2, |cell| !blocked.contains(&cell)),
            None
        );
    }
}
