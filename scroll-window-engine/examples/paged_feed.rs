// Example: drive an `Engine` against an in-memory model whose pages "arrive" later.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use scroll_window_engine::scroll_window::{Group, Placement};
use scroll_window_engine::{
    Element, Engine, EngineOptions, FetchError, FetchTicket, HeaderElement, ItemElement, Model,
    Renderer, Settled,
};

#[derive(Clone, Debug)]
struct Message {
    id: u64,
    text: String,
}

/// Queues tickets; `main` plays the network by draining the queue.
struct Feed {
    total: usize,
    queue: Rc<RefCell<VecDeque<FetchTicket>>>,
}

impl Model for Feed {
    type Datum = Message;

    fn total(&self) -> usize {
        self.total
    }

    fn groups(&self) -> Vec<Group> {
        // One "day" header every 40 messages.
        (0..self.total)
            .step_by(40)
            .map(|begin| Group::new(begin, (begin + 40).min(self.total)))
            .collect()
    }

    fn page_size(&self) -> usize {
        25
    }

    fn fetch_page(&mut self, ticket: FetchTicket) {
        self.queue.borrow_mut().push_back(ticket);
    }
}

/// A text "container": each node is one line.
#[derive(Default)]
struct Lines {
    lines: Rc<RefCell<Vec<String>>>,
}

struct Line {
    text: String,
    lines: Rc<RefCell<Vec<String>>>,
}

impl Element for Line {
    type Node = String;

    fn root(&self) -> &String {
        &self.text
    }

    fn destroy(self) {
        self.lines.borrow_mut().retain(|l| *l != self.text);
    }
}

impl ItemElement for Line {
    fn mark_first(&mut self, _first: bool) {}

    fn place(&mut self, _placement: Placement) {}
}

impl HeaderElement for Line {}

impl Renderer for Lines {
    type Datum = Message;
    type Key = u64;
    type Node = String;
    type Item = Line;
    type Header = Line;
    type Empty = Line;

    fn identity(&self, datum: &Message) -> u64 {
        datum.id
    }

    fn create_item(&mut self, datum: &Message, index: usize) -> Line {
        self.line(format!("  #{index:<5} {}", datum.text))
    }

    fn create_header(&mut self, group: Group) -> Line {
        self.line(format!("== day starting at {} ==", group.begin))
    }

    fn create_empty(&mut self) -> Line {
        self.line("(loading)".to_owned())
    }

    fn insert_before(&mut self, node: &String, anchor: Option<&String>) {
        let mut lines = self.lines.borrow_mut();
        lines.retain(|l| l != node);
        let at = anchor
            .and_then(|a| lines.iter().position(|l| l == a))
            .unwrap_or(lines.len());
        lines.insert(at, node.clone());
    }
}

impl Lines {
    fn line(&self, text: String) -> Line {
        Line {
            text,
            lines: self.lines.clone(),
        }
    }
}

fn main() {
    let queue = Rc::new(RefCell::new(VecDeque::new()));
    let renderer = Lines::default();
    let lines = renderer.lines.clone();
    let options = EngineOptions::list(20)
        .with_header_size(30)
        .with_viewport_extent(120)
        .with_extra_margin(1)
        .with_on_settled(Some(|s: &Settled| {
            println!("settled cycle={:?} ok={}", s.cycle, s.result.is_ok())
        }));
    let mut engine = Engine::new(
        Feed {
            total: 500,
            queue: queue.clone(),
        },
        renderer,
        options,
    );

    for scroll in [0, 1_000, 980] {
        engine.scroll_to(scroll);
        println!("scroll={scroll} candidate={:?}", engine.candidate());
        print_lines(&lines);

        loop {
            let next = queue.borrow_mut().pop_front();
            let Some(ticket) = next else {
                break;
            };
            let result = if ticket.page == 3 && scroll == 1_000 {
                Err(FetchError::new("simulated timeout"))
            } else {
                let start = ticket.page * 25;
                Ok((start..(start + 25).min(500))
                    .map(|i| Message {
                        id: i as u64,
                        text: format!("message {i}"),
                    })
                    .collect())
            };
            let resolution = engine.complete_fetch(ticket, result);
            println!("page {} -> {resolution:?}", ticket.page);
        }
        print_lines(&lines);
    }
}

fn print_lines(lines: &Rc<RefCell<Vec<String>>>) {
    for line in lines.borrow().iter() {
        println!("| {line}");
    }
    println!();
}
