use crate::models::TrendGrid;

/// Raw names shorter than this never become columns.
pub const MIN_NAME_LEN: usize = 5;

/// Extract the display name from a dotted point path: truncate at the last
/// `.`, then take everything after the remaining last `.`.
///
/// `System:ManagementView.Building1.Chiller2.Power` -> `Chiller2`. A name
/// with a single `.` yields the part before it. A name with no `.` is
/// returned unchanged.
pub fn clean_name(raw: &str) -> String {
    match raw.rfind('.') {
        None => raw.to_string(),
        Some(p_left) => {
            let left = &raw[..p_left];
            match left.rfind('.') {
                Some(p_right) => left[p_right + 1..].to_string(),
                None => left.to_string(),
            }
        }
    }
}

/// Drop columns whose raw name is too short, then rename the rest to their
/// cleaned display names. Cell data for kept columns is untouched.
pub fn clean_columns(grid: TrendGrid) -> TrendGrid {
    let keep: Vec<usize> = grid
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| name.chars().count() >= MIN_NAME_LEN)
        .map(|(i, _)| i)
        .collect();

    let columns: Vec<String> = keep.iter().map(|&i| clean_name(&grid.columns[i])).collect();
    let cells = grid
        .cells
        .into_iter()
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();

    TrendGrid {
        timestamps: grid.timestamps,
        columns,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use chrono::NaiveDate;

    #[test]
    fn extracts_second_to_last_segment() {
        assert_eq!(
            clean_name("System:ManagementView.Building1.Chiller2.Power"),
            "Chiller2"
        );
        assert_eq!(clean_name("System:View.BuildingA.AHU1.Temperature"), "AHU1");
    }

    #[test]
    fn single_dot_yields_left_part() {
        assert_eq!(clean_name("AHU1.Temp"), "AHU1");
    }

    #[test]
    fn dotless_name_is_unchanged() {
        assert_eq!(clean_name("Boiler7"), "Boiler7");
    }

    #[test]
    fn short_names_are_dropped_not_renamed() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let grid = TrendGrid {
            timestamps: vec![ts],
            columns: vec!["abcd".to_string(), "Plant.AHU1.Temp".to_string()],
            cells: vec![vec![
                CellValue::Text("1".into()),
                CellValue::Text("2".into()),
            ]],
        };

        let cleaned = clean_columns(grid);
        assert_eq!(cleaned.columns, vec!["AHU1"]);
        assert_eq!(cleaned.cell(0, 0), &CellValue::Text("2".into()));
    }
}
