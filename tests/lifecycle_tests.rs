use std::cell::RefCell;
use std::rc::Rc;

use linked_charts::{ChartError, ChartId};
use linked_charts::api::{Anchor, BaseChart, MandatoryAttribute};
use linked_charts::core::{GroupRecord, RecordingDimension, StaticGroup};
use linked_charts::error::ChartResult;
use linked_charts::extensions::{ChartEvent, Legend, LegendItem};
use linked_charts::render::{ChartDrawer, DrawContext, HeadlessSurface, finish_transitions};

type Log = Rc<RefCell<Vec<String>>>;

/// Drawer that generates an svg on render and logs its draw steps.
struct LoggingDrawer {
    log: Log,
    legend_items: Vec<LegendItem>,
}

impl ChartDrawer for LoggingDrawer {
    fn do_render(&mut self, ctx: &mut DrawContext<'_>) -> ChartResult<()> {
        ctx.reset_svg();
        let rows = ctx.ordered_data().len();
        self.log.borrow_mut().push(format!("draw:render:{rows}"));
        Ok(())
    }

    fn do_redraw(&mut self, _ctx: &mut DrawContext<'_>) -> ChartResult<()> {
        self.log.borrow_mut().push("draw:redraw".to_owned());
        Ok(())
    }

    fn has_attribute(&self, name: &str) -> bool {
        name == "colors"
    }

    fn legendables(&self) -> Vec<LegendItem> {
        self.legend_items.clone()
    }
}

struct LoggingLegend(Log);

impl Legend for LoggingLegend {
    fn render(&mut self, _chart_id: ChartId, items: &[LegendItem]) -> ChartResult<()> {
        self.0.borrow_mut().push(format!("legend:{}", items.len()));
        Ok(())
    }
}

fn listen(chart: &BaseChart<LoggingDrawer>, log: &Log) {
    for channel in [
        "preRender",
        "postRender",
        "preRedraw",
        "postRedraw",
        "pretransition",
        "renderlet",
    ] {
        let log = log.clone();
        chart.on(
            &format!("{channel}.log"),
            Some(Rc::new(move |event: &ChartEvent| {
                log.borrow_mut().push(event.channel.to_string())
            })),
        );
    }
}

fn chart(log: &Log) -> (BaseChart<LoggingDrawer>, Rc<RefCell<HeadlessSurface>>) {
    let surface = HeadlessSurface::with_bounding_box(400.0, 300.0).shared();
    let mut chart = BaseChart::new(LoggingDrawer {
        log: log.clone(),
        legend_items: vec![LegendItem::new("a"), LegendItem::new("b").with_color("#f00")],
    });
    chart.set_dimension(RecordingDimension::new().shared());
    chart.set_group(
        StaticGroup::new(vec![GroupRecord::new("x", 1), GroupRecord::new("y", 2)]).shared(),
        None,
    );
    chart
        .anchor(Some(Anchor::element("#chart", surface.clone())))
        .expect("anchor");
    listen(&chart, log);
    (chart, surface)
}

#[test]
fn animated_render_orders_events_around_the_transition() {
    let log = Log::default();
    let (mut chart, surface) = chart(&log);
    chart.set_legend(Some(Box::new(LoggingLegend(log.clone()))));

    chart.render().expect("render");
    assert_eq!(
        *log.borrow(),
        vec!["preRender", "draw:render:2", "legend:2", "pretransition"]
    );

    assert_eq!(finish_transitions(&surface), 1);
    assert_eq!(
        *log.borrow(),
        vec![
            "preRender",
            "draw:render:2",
            "legend:2",
            "pretransition",
            "renderlet",
            "postRender"
        ]
    );
}

#[test]
fn redraw_without_transition_fires_synchronously() {
    let log = Log::default();
    let (mut chart, surface) = chart(&log);
    chart.set_transition_duration_ms(0);
    chart.render().expect("render");
    log.borrow_mut().clear();

    chart.redraw().expect("redraw");

    assert_eq!(
        *log.borrow(),
        vec!["preRedraw", "draw:redraw", "pretransition", "renderlet", "postRedraw"]
    );
    assert_eq!(surface.borrow().pending_transitions(), 0);
}

#[test]
fn missing_group_is_reported_before_drawing() {
    let log = Log::default();
    let mut chart = BaseChart::new(LoggingDrawer {
        log: log.clone(),
        legend_items: Vec::new(),
    });
    chart.set_dimension(RecordingDimension::new().shared());
    chart
        .anchor(Some(Anchor::element(
            "#pie",
            HeadlessSurface::new().shared(),
        )))
        .expect("anchor");

    let err = chart.render().expect_err("group is mandatory");
    match &err {
        ChartError::MissingMandatoryAttribute { attribute, chart } => {
            assert_eq!(attribute, "group");
            assert_eq!(chart, "pie");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_configuration_error());
    assert!(log.borrow().iter().all(|entry| !entry.starts_with("draw")));
}

#[test]
fn drawer_specific_mandatory_attributes_are_checked() {
    let log = Log::default();
    let (mut chart, _surface) = chart(&log);
    chart.set_mandatory_attributes(vec![
        MandatoryAttribute::Group,
        MandatoryAttribute::Drawer("colors".to_owned()),
    ]);
    chart.render().expect("drawer answers colors");

    chart.set_mandatory_attributes(vec![MandatoryAttribute::Drawer("x_axis".to_owned())]);
    let err = chart.render().expect_err("no x axis");
    assert!(err.to_string().contains("chart.x_axis"));
}

#[test]
fn draw_failures_propagate_unchanged() {
    struct FailingDrawer;

    impl ChartDrawer for FailingDrawer {
        fn do_render(&mut self, _ctx: &mut DrawContext<'_>) -> ChartResult<()> {
            Err(ChartError::Draw("boom".to_owned()))
        }

        fn do_redraw(&mut self, _ctx: &mut DrawContext<'_>) -> ChartResult<()> {
            Ok(())
        }
    }

    let mut chart = BaseChart::new(FailingDrawer);
    chart.set_mandatory_attributes(Vec::new());
    let err = chart.render().expect_err("drawer fails");
    assert!(matches!(err, ChartError::Draw(message) if message == "boom"));
}

#[test]
fn render_regenerates_svg_at_current_size() {
    let log = Log::default();
    let (mut chart, surface) = chart(&log);
    chart.render().expect("first render");
    assert!(chart.svg());
    surface.borrow_mut().set_bounding_box(Some((640.0, 480.0)));

    chart.render().expect("second render");

    let surface = surface.borrow();
    assert_eq!(surface.svg_resets(), 2);
    assert_eq!(surface.svg_size(), Some((640.0, 480.0)));
}
