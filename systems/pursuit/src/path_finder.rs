//! Greedy depth-first route search over a disposable working layout.

use maze_chase_core::{Direction, GridPosition, Route, WorkingLayout};

/// Searches for a route from `start` to `target`.
///
/// Neighbors are visited in order of Manhattan distance to the target, ties
/// keeping the up, down, left, right order, and the first branch that reaches
/// the target wins. The result is therefore not necessarily the shortest
/// route. Every accepted neighbor is marked as a wall in `working` so no cell
/// is visited twice. The returned route excludes `start` and ends at `target`;
/// it is empty when `start == target` or the target is unreachable.
pub fn find_route(start: GridPosition, target: GridPosition, working: &mut WorkingLayout) -> Route {
    if start == target {
        return Route::new();
    }

    working.mark_wall(start);
    let mut stack = vec![SearchFrame::expand(start, target, working)];

    while let Some(frame) = stack.last_mut() {
        let Some(candidate) = frame.next_candidate() else {
            let _ = stack.pop();
            continue;
        };

        if candidate == target {
            return stack
                .iter()
                .skip(1)
                .map(|frame| frame.cell)
                .chain(std::iter::once(candidate))
                .collect();
        }

        stack.push(SearchFrame::expand(candidate, target, working));
    }

    Route::new()
}

/// One level of the depth-first search, holding the sorted candidates of a cell.
#[derive(Clone, Copy, Debug)]
struct SearchFrame {
    cell: GridPosition,
    candidates: [GridPosition; 4],
    len: usize,
    cursor: usize,
}

impl SearchFrame {
    fn expand(cell: GridPosition, target: GridPosition, working: &mut WorkingLayout) -> Self {
        let bounds = working.bounds();
        let mut candidates = [cell; 4];
        let mut len = 0;

        for direction in Direction::ALL {
            let (dx, dy) = direction.grid_delta();
            let neighbor = bounds.clamp(
                i64::from(cell.column()) + dx,
                i64::from(cell.row()) + dy,
            );
            if working.is_wall(neighbor) {
                continue;
            }
            working.mark_wall(neighbor);
            candidates[len] = neighbor;
            len += 1;
        }

        // Stable, so ties keep the enumeration order.
        candidates[..len].sort_by_key(|candidate| candidate.manhattan_distance(target));

        Self {
            cell,
            candidates,
            len,
            cursor: 0,
        }
    }

    fn next_candidate(&mut self) -> Option<GridPosition> {
        if self.cursor >= self.len {
            return None;
        }
        let candidate = self.candidates[self.cursor];
        self.cursor += 1;
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::LevelLayout;

    fn cells(route: &Route) -> Vec<(u32, u32)> {
        route
            .iter()
            .map(|cell| (cell.column(), cell.row()))
            .collect()
    }

    #[test]
    fn start_equal_to_target_yields_empty_route() {
        let layout = LevelLayout::from_ascii("...").expect("valid layout");
        let cell = GridPosition::new(1, 0);

        assert!(find_route(cell, cell, &mut layout.working_copy()).is_empty());
    }

    #[test]
    fn wall_in_single_row_blocks_route() {
        let layout = LevelLayout::from_ascii("..#.").expect("valid layout");

        let route = find_route(
            GridPosition::new(0, 0),
            GridPosition::new(3, 0),
            &mut layout.working_copy(),
        );

        assert!(route.is_empty());
    }

    #[test]
    fn straight_corridor_route_excludes_start() {
        let layout = LevelLayout::from_ascii("....").expect("valid layout");

        let route = find_route(
            GridPosition::new(0, 0),
            GridPosition::new(3, 0),
            &mut layout.working_copy(),
        );

        assert_eq!(cells(&route), vec![(1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn ties_prefer_up_down_left_right_order() {
        let layout = LevelLayout::from_ascii(
            "
            ...
            ...
            ...
            ",
        )
        .expect("valid layout");

        let route = find_route(
            GridPosition::new(0, 0),
            GridPosition::new(2, 2),
            &mut layout.working_copy(),
        );

        // Down and right are equally close; down is enumerated first.
        assert_eq!(cells(&route), vec![(0, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn greedy_search_may_return_a_detour() {
        let layout = LevelLayout::from_ascii(
            "
            .....
            .###.
            .....
            ",
        )
        .expect("valid layout");

        let route = find_route(
            GridPosition::new(1, 0),
            GridPosition::new(2, 2),
            &mut layout.working_copy(),
        );

        // The right-hand neighbor looks closer, so the search commits to the
        // long way around even though the left side is two cells shorter.
        assert_eq!(
            cells(&route),
            vec![(2, 0), (3, 0), (4, 0), (4, 1), (4, 2), (3, 2), (2, 2)]
        );
    }

    #[test]
    fn search_marks_visited_cells_in_working_copy_only() {
        let layout = LevelLayout::from_ascii("...").expect("valid layout");
        let mut working = layout.working_copy();

        let route = find_route(GridPosition::new(0, 0), GridPosition::new(2, 0), &mut working);

        assert_eq!(route.len(), 2);
        assert!(working.is_wall(GridPosition::new(0, 0)));
        assert!(working.is_wall(GridPosition::new(1, 0)));
        assert!(layout.is_open(GridPosition::new(0, 0)));
    }
}
