use std::collections::{HashSet, VecDeque};

use maze_chase_core::{GridPosition, LevelLayout};
use maze_chase_system_pursuit::{find_route, plan_route};
use proptest::prelude::*;

fn layout_strategy() -> impl Strategy<Value = (LevelLayout, GridPosition, GridPosition)> {
    (1_usize..=8, 1_usize..=8).prop_flat_map(|(columns, rows)| {
        (
            prop::collection::vec(prop::bool::weighted(0.3), columns * rows),
            0..columns,
            0..rows,
            0..columns,
            0..rows,
        )
            .prop_map(move |(walls, start_column, start_row, target_column, target_row)| {
                let mut table: Vec<Vec<u8>> = walls
                    .chunks(columns)
                    .map(|row| row.iter().map(|wall| u8::from(*wall)).collect())
                    .collect();
                table[start_row][start_column] = 0;
                table[target_row][target_column] = 0;
                let layout = LevelLayout::from_rows(table).expect("generated layout is valid");
                let start = GridPosition::new(start_column as u32, start_row as u32);
                let target = GridPosition::new(target_column as u32, target_row as u32);
                (layout, start, target)
            })
    })
}

fn reachable(layout: &LevelLayout, start: GridPosition, target: GridPosition) -> bool {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        if cell == target {
            return true;
        }
        let (column, row) = (cell.column(), cell.row());
        let neighbors = [
            row.checked_sub(1).map(|row| GridPosition::new(column, row)),
            Some(GridPosition::new(column, row + 1)),
            column.checked_sub(1).map(|column| GridPosition::new(column, row)),
            Some(GridPosition::new(column + 1, row)),
        ];
        for neighbor in neighbors.into_iter().flatten() {
            if layout.is_open(neighbor) && seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    false
}

proptest! {
    #[test]
    fn routes_reach_the_target_exactly_when_it_is_reachable(
        (layout, start, target) in layout_strategy()
    ) {
        let route = find_route(start, target, &mut layout.working_copy());

        if start == target || !reachable(&layout, start, target) {
            prop_assert!(route.is_empty());
        } else {
            prop_assert_eq!(route.last(), Some(target));
        }
    }

    #[test]
    fn routes_are_contiguous_walks_over_open_cells(
        (layout, start, target) in layout_strategy()
    ) {
        let route = plan_route(start, target, &layout);
        let mut previous = start;
        let mut visited = HashSet::from([start]);

        for &cell in &route {
            prop_assert!(layout.is_open(cell));
            prop_assert_eq!(previous.manhattan_distance(cell), 1);
            prop_assert!(visited.insert(cell), "cell {:?} visited twice", cell);
            previous = cell;
        }
    }
}
