use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Query the view with this id (repeatable, -1 for the active view).
    #[arg(short = 'i', long = "view-id", allow_negative_numbers = true)]
    pub view_ids: Vec<i32>,

    /// Query all toplevel and desktop-environment views.
    #[arg(short = 'l', long = "all-views", conflicts_with = "view_ids")]
    pub all_views: bool,

    /// Print the views as JSON.
    #[arg(short, long)]
    pub json: bool,
}

/// What to ask the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Pick a view by clicking on it.
    Pick,
    ById(Vec<i32>),
    All,
}

impl Cli {
    pub fn query(&self) -> Query {
        if self.all_views {
            Query::All
        } else if !self.view_ids.is_empty() {
            Query::ById(self.view_ids.clone())
        } else {
            Query::Pick
        }
    }
}
