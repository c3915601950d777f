use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};

use imoveis_core::filter::{parse_poly_param, ListingFilter};
use imoveis_core::format::{build_description, build_title, coerce_num_str};
use imoveis_core::search;
use imoveis_core::seo;

use crate::models::{
    embed_json, CardView, FilterForm, HomeParams, MapPoint, SearchParams, SearchResult,
};
use crate::state::AppState;
use crate::templates::{
    DetailView, IndexTemplate, MapTemplate, NotFoundTemplate, PropertyTemplate, Shell,
};
use crate::viewer3d;

const EMPTY_POLY_MSG: &str = "Não encontramos resultados nessa região. Ainda podemos ter o que \
     procura à venda de forma privada — entre em contato para mais informações.";
const EMPTY_SEARCH_MSG: &str = "Não encontramos nada parecido na busca. Ainda podemos ter o que \
     procura à venda de forma privada — entre em contato para mais informações.";

pub async fn index(State(state): State<AppState>, Query(params): Query<HomeParams>) -> Response {
    let poly = params.poly.as_deref().and_then(parse_poly_param);
    let filter = ListingFilter {
        uf: params
            .uf
            .as_deref()
            .map(|u| u.trim().to_uppercase())
            .filter(|u| !u.is_empty()),
        min_area: params.min_area.as_deref().and_then(coerce_num_str),
        max_area: params.max_area.as_deref().and_then(coerce_num_str),
        min_preco: params.min_preco.as_deref().and_then(coerce_num_str),
        max_preco: params.max_preco.as_deref().and_then(coerce_num_str),
        poly: poly.clone(),
    };

    let all = state.store.list_properties();
    let filtered = filter.apply(&all);
    let cards: Vec<CardView> = filtered.iter().map(CardView::from_property).collect();

    let empty_message = if cards.is_empty() {
        if poly.is_some() {
            EMPTY_POLY_MSG.to_string()
        } else {
            EMPTY_SEARCH_MSG.to_string()
        }
    } else {
        String::new()
    };

    let template = IndexTemplate {
        shell: Shell::from_config(&state.config),
        cards,
        filters: FilterForm {
            uf: params.uf.unwrap_or_default(),
            min_area: params.min_area.unwrap_or_default(),
            max_area: params.max_area.unwrap_or_default(),
            min_preco: params.min_preco.unwrap_or_default(),
            max_preco: params.max_preco.unwrap_or_default(),
            poly: params.poly.unwrap_or_default(),
        },
        empty_message,
    };
    Html(template.render().expect("Template rendering failed")).into_response()
}

pub async fn property_page(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Response {
    let Some(prop) = state.store.get_by_slug_or_id(&id_or_slug) else {
        let template = NotFoundTemplate {
            shell: Shell::from_config(&state.config),
        };
        return (
            StatusCode::NOT_FOUND,
            Html(template.render().expect("Template rendering failed")),
        )
            .into_response();
    };

    // Explicit viewer content in the folder wins; otherwise probe the
    // published viewer repo for this listing code.
    let viewer3d_url = match &prop.viewer3d {
        Some(url) if !url.is_empty() => url.clone(),
        _ => viewer3d::resolve_viewer_url(
            &state.http,
            &state.config.viewer3d,
            &state.viewer_cache,
            &prop.id,
        )
        .await
        .map(|u| viewer3d::ensure_trailing_slash(&u))
        .unwrap_or_default(),
    };

    let all = state.store.list_properties();
    let similares = search::similar_listings(&all, &prop, 5)
        .iter()
        .map(CardView::from_property)
        .collect();

    let card = CardView::from_property(&prop);
    let base_url = &state.config.base_url;
    let meta_title = build_title(&prop, &state.config.site_name);
    let meta_description = build_description(&prop);
    let og_image = prop
        .fotos
        .first()
        .map(|f| seo::absolute_url(base_url, f))
        .unwrap_or_else(|| seo::absolute_url(base_url, &state.config.og_default_image));

    let map_points_json = MapPoint::from_property(&prop)
        .map(|pt| embed_json(&vec![pt]))
        .unwrap_or_default();

    let detail = DetailView {
        id: prop.id.clone(),
        titulo: prop.titulo.clone(),
        endereco: card.endereco.clone(),
        preco: card.preco.clone(),
        comparativo: card.comparativo.clone(),
        sold: card.sold,
        discounted: card.discounted,
        price_class: card.price_class,
        fotos: prop.fotos.clone(),
        descricao_html: prop.descricao_html.clone().unwrap_or_default(),
        paragraphs: prop.descricao.clone(),
        diferenciais: prop.diferenciais.clone(),
        map_points_json,
        viewer3d_url,
        similares,
        meta_title,
        meta_description,
        canonical: seo::absolute_url(base_url, &prop.href()),
        og_image,
        json_ld: seo::listing_json_ld(&prop, base_url, &state.config.site_name).to_string(),
        breadcrumb_ld: seo::breadcrumb_json_ld(&prop, base_url).to_string(),
    };

    let template = PropertyTemplate {
        shell: Shell::from_config(&state.config),
        detail,
    };
    Html(template.render().expect("Template rendering failed")).into_response()
}

pub async fn map_page(State(state): State<AppState>) -> impl IntoResponse {
    let points: Vec<MapPoint> = state
        .store
        .list_properties()
        .iter()
        .filter_map(MapPoint::from_property)
        .collect();
    let template = MapTemplate {
        shell: Shell::from_config(&state.config),
        count: points.len(),
        points_json: embed_json(&points),
    };
    Html(template.render().expect("Template rendering failed"))
}

pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchResult>> {
    let q = params.q.unwrap_or_default();
    let items = state.store.list_properties();
    let hits = search::search(&items, &q)
        .iter()
        .map(SearchResult::from_property)
        .collect();
    Json(hits)
}

pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let base = state.config.base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    let mut push = |loc: String, changefreq: &str, priority: &str| {
        xml.push_str(&format!(
            "  <url><loc>{}</loc><changefreq>{}</changefreq><priority>{}</priority></url>\n",
            loc, changefreq, priority
        ));
    };
    push(format!("{}/", base), "daily", "1.0");
    push(format!("{}/mapa", base), "daily", "0.7");
    push(format!("{}/contato", base), "yearly", "0.2");
    for p in state.store.list_properties() {
        push(format!("{}{}", base, p.href()), "weekly", "0.8");
    }
    xml.push_str("</urlset>\n");

    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
}

pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let base = state.config.base_url.trim_end_matches('/');
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}
