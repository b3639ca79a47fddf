pub mod controls;
pub mod dialogs;
pub mod gantt_chart;
pub mod lane_table;
pub mod theme;
