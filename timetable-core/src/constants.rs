/// Literal format of every StartTime/EndTime cell.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Field delimiter for both file shapes.
pub const DELIMITER: char = ',';

/// Minute grid used by the schedule editor that produces these files.
pub const DEFAULT_MINUTE_STEP: u32 = 30;

/// Subject label for student files when none is configured.
pub const DEFAULT_STUDENT: &str = "student";

pub const STUDENT_FILE_NAME: &str = "student_schedule.csv";
pub const PROFESSOR_FILE_NAME: &str = "professors.csv";
