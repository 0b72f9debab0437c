use foundation::bounds::LatLng;
use protocol::QueryResultRecord;
use query::geometry::parse_point;
use runtime::debounce::Millis;

use crate::layer::{Layer, LayerId};
use crate::popup::{HoverIntent, PointerEvent};
use crate::surface::{MarkerHandle, MarkerSpec, MarkerSurface, PopupContent};
use crate::symbology::{HslColor, MarkerStyle, color_of};

/// A result row ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePoint {
    pub record: QueryResultRecord,
    pub position: LatLng,
    pub color: HslColor,
}

impl ArticlePoint {
    /// `None` if the record's geometry literal does not parse.
    pub fn from_record(record: QueryResultRecord) -> Option<Self> {
        let position = parse_point(&record.coord)?.to_lat_lng();
        let color = color_of(&record.id);
        Some(Self {
            record,
            position,
            color,
        })
    }

    pub fn title(&self) -> String {
        match self.record.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => short_entity_id(&self.record.id).to_string(),
        }
    }

    pub fn popup(&self) -> PopupContent {
        PopupContent {
            title: self.title(),
            date: self.record.when.as_deref().map(date_part),
            entity_url: self.record.id.clone(),
            article_url: self.record.article.clone(),
        }
    }

    pub fn marker_spec(&self) -> MarkerSpec {
        MarkerSpec {
            position: self.position,
            style: MarkerStyle::new(self.color),
            tooltip: self.title(),
            popup: self.popup(),
        }
    }
}

/// Records with unparsable geometry are dropped silently.
pub fn article_points(records: impl IntoIterator<Item = QueryResultRecord>) -> Vec<ArticlePoint> {
    records
        .into_iter()
        .filter_map(ArticlePoint::from_record)
        .collect()
}

/// `http://www.wikidata.org/entity/Q42` -> `Q42`.
pub fn short_entity_id(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// `1936-07-17T00:00:00Z` -> `1936-07-17`. Negative years keep their sign.
pub fn date_part(when: &str) -> String {
    when.split_once('T')
        .map(|(d, _)| d)
        .unwrap_or(when)
        .to_string()
}

#[derive(Debug)]
struct PlacedMarker {
    handle: MarkerHandle,
    point: ArticlePoint,
    hover: HoverIntent,
}

/// The markers currently on the map.
///
/// Every new point set clears the surface and rebuilds it; markers keep no
/// identity across updates.
#[derive(Debug)]
pub struct MarkerLayer {
    id: LayerId,
    markers: Vec<PlacedMarker>,
    grace_ms: Millis,
}

impl MarkerLayer {
    pub fn new(id: u64) -> Self {
        Self::with_grace(id, crate::popup::POPUP_CLOSE_GRACE_MS)
    }

    pub fn with_grace(id: u64, grace_ms: Millis) -> Self {
        Self {
            id: LayerId(id),
            markers: Vec::new(),
            grace_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &ArticlePoint> {
        self.markers.iter().map(|m| &m.point)
    }

    pub fn handles(&self) -> Vec<MarkerHandle> {
        self.markers.iter().map(|m| m.handle).collect()
    }

    pub fn clear<S: MarkerSurface + ?Sized>(&mut self, surface: &mut S) {
        for m in self.markers.drain(..) {
            surface.remove(m.handle);
        }
    }

    pub fn replace<S: MarkerSurface + ?Sized>(&mut self, points: Vec<ArticlePoint>, surface: &mut S) {
        self.clear(surface);
        self.markers.reserve(points.len());
        for point in points {
            let handle = surface.place(point.marker_spec());
            self.markers.push(PlacedMarker {
                handle,
                point,
                hover: HoverIntent::new(self.grace_ms),
            });
        }
    }

    /// Route a pointer event to the marker behind `handle`.
    pub fn pointer<S: MarkerSurface + ?Sized>(
        &mut self,
        handle: MarkerHandle,
        event: PointerEvent,
        now: Millis,
        surface: &mut S,
    ) {
        let Some(m) = self.markers.iter_mut().find(|m| m.handle == handle) else {
            return;
        };
        if let Some(open) = m.hover.handle(event, now) {
            surface.set_popup_open(handle, open);
        }
    }

    /// Close popups whose grace period has run out.
    pub fn tick<S: MarkerSurface + ?Sized>(&mut self, now: Millis, surface: &mut S) -> usize {
        let mut closed = 0;
        for m in &mut self.markers {
            if m.hover.tick(now) {
                surface.set_popup_open(m.handle, false);
                closed += 1;
            }
        }
        closed
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.markers.iter().filter_map(|m| m.hover.deadline()).min()
    }

    pub fn popup_visible(&self, handle: MarkerHandle) -> bool {
        self.markers
            .iter()
            .any(|m| m.handle == handle && m.hover.is_visible())
    }
}

impl Layer for MarkerLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn marker_count(&self) -> usize {
        self.len()
    }

    fn clear_from(&mut self, surface: &mut dyn MarkerSurface) {
        self.clear(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use pretty_assertions::assert_eq;

    fn record(q: u32, coord: &str) -> QueryResultRecord {
        QueryResultRecord {
            id: format!("http://www.wikidata.org/entity/Q{q}"),
            label: Some(format!("Item {q}")),
            coord: coord.to_string(),
            when: Some("1936-07-17T00:00:00Z".to_string()),
            article: None,
        }
    }

    #[test]
    fn points_drop_bad_geometry_and_swap_axes() {
        let points = article_points(vec![
            record(1, "Point(-3.7 40.4)"),
            record(2, "Point(abc def)"),
            record(3, "(1 2)"),
        ]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].position, LatLng::new(40.4, -3.7));
        assert_eq!(points[0].color, color_of("http://www.wikidata.org/entity/Q1"));
    }

    #[test]
    fn popup_content() {
        let mut rec = record(42, "Point(0 0)");
        rec.label = None;
        rec.article = Some("https://en.wikipedia.org/wiki/X".into());
        let p = ArticlePoint::from_record(rec).expect("point");
        assert_eq!(
            p.popup(),
            PopupContent {
                title: "Q42".into(),
                date: Some("1936-07-17".into()),
                entity_url: "http://www.wikidata.org/entity/Q42".into(),
                article_url: Some("https://en.wikipedia.org/wiki/X".into()),
            }
        );
        assert_eq!(date_part("-0500-01-01T00:00:00Z"), "-0500-01-01");
    }

    #[test]
    fn replace_rebuilds_every_marker() {
        let mut surface = RecordingSurface::new();
        let mut layer = MarkerLayer::new(1);

        layer.replace(
            article_points(vec![record(1, "Point(1 2)"), record(2, "Point(3 4)")]),
            &mut surface,
        );
        let first = layer.handles();
        assert_eq!(surface.len(), 2);

        // Same data again: still cleared and re-placed.
        layer.replace(
            article_points(vec![record(1, "Point(1 2)"), record(2, "Point(3 4)")]),
            &mut surface,
        );
        assert_eq!(surface.len(), 2);
        assert_eq!(surface.placed_total(), 4);
        assert!(first.iter().all(|h| surface.marker(*h).is_none()));

        layer.replace(Vec::new(), &mut surface);
        assert!(surface.is_empty());
        assert!(layer.is_empty());
    }

    #[test]
    fn hover_intent_drives_surface_popups() {
        let mut surface = RecordingSurface::new();
        let mut layer = MarkerLayer::with_grace(1, 200);
        layer.replace(article_points(vec![record(1, "Point(1 2)")]), &mut surface);
        let h = layer.handles()[0];

        layer.pointer(h, PointerEvent::MarkerEnter, 0, &mut surface);
        assert!(surface.is_popup_open(h));

        layer.pointer(h, PointerEvent::MarkerLeave, 100, &mut surface);
        assert_eq!(layer.next_deadline(), Some(300));
        layer.pointer(h, PointerEvent::PopupEnter, 250, &mut surface);
        assert_eq!(layer.tick(400, &mut surface), 0);
        assert!(surface.is_popup_open(h));

        layer.pointer(h, PointerEvent::PopupLeave, 500, &mut surface);
        assert_eq!(layer.tick(699, &mut surface), 0);
        assert_eq!(layer.tick(700, &mut surface), 1);
        assert!(!surface.is_popup_open(h));
        assert!(!layer.popup_visible(h));
    }

    #[test]
    fn clearing_through_the_layer_trait() {
        let mut surface = RecordingSurface::new();
        let mut layer = MarkerLayer::new(7);
        layer.replace(
            article_points(vec![record(1, "Point(1 2)"), record(2, "Point(3 4)")]),
            &mut surface,
        );

        let dyn_layer: &mut dyn Layer = &mut layer;
        assert_eq!(dyn_layer.id(), LayerId(7));
        assert_eq!(dyn_layer.marker_count(), 2);
        dyn_layer.clear_from(&mut surface);
        assert_eq!(dyn_layer.marker_count(), 0);
        assert!(surface.is_empty());
    }

    #[test]
    fn events_for_removed_markers_are_ignored() {
        let mut surface = RecordingSurface::new();
        let mut layer = MarkerLayer::new(1);
        layer.replace(article_points(vec![record(1, "Point(1 2)")]), &mut surface);
        let stale = layer.handles()[0];
        layer.replace(article_points(vec![record(2, "Point(1 2)")]), &mut surface);

        layer.pointer(stale, PointerEvent::MarkerEnter, 0, &mut surface);
        assert!(!surface.is_popup_open(stale));
        assert!(!layer.popup_visible(stale));
    }
}
