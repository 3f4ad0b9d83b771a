// API request handlers
// Author: Gabriel Demetrios Lafis

use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use log::debug;

use super::{models::*, ApiError};
use crate::chart::{ChartFamily, ChartMapper};
use crate::data::{rowset_from_json, rowset_to_json, RowSet};
use crate::report::{validate_binding, ParameterBinder, ParameterExtractor};
use crate::table::{export_file_name, SortState, TableEngine};

/// Shared handler settings
#[derive(Debug, Clone, Copy)]
pub struct ApiState {
    pub delimiter: char,
}

impl Default for ApiState {
    fn default() -> Self {
        ApiState { delimiter: ',' }
    }
}

/// Placeholders of a template, plus the ones missing from `known`
pub async fn extract_template_parameters(payload: web::Json<ExtractRequest>) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let extractor = ParameterExtractor::new();

    let response = ExtractResponse {
        parameters: extractor.extract(&req.template),
        discovered: extractor.discover(&req.template, &req.known),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Defaults overlaid with the previous binding, then validated
pub async fn bind_parameters(payload: web::Json<BindRequest>) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let binder = match req.today {
        Some(today) => ParameterBinder::for_date(today),
        None => ParameterBinder::new(),
    };

    let binding = binder.bind(&req.parameters, &req.previous);
    let error = validate_binding(&req.parameters, &binding).err().map(|err| err.to_string());

    Ok(HttpResponse::Ok().json(BindResponse {
        binding,
        valid: error.is_none(),
        error,
    }))
}

pub async fn map_chart(payload: web::Json<ChartRequest>) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let rows = rowset_from_json(&req.results)?;
    let family = req
        .chart_family
        .unwrap_or_else(|| ChartFamily::infer_from_report_name(&req.report_name));

    debug!("Mapping {} rows to a {} chart", rows.len(), family);
    let chart = ChartMapper::new().map(&rows, family);

    Ok(HttpResponse::Ok().json(ChartResponse {
        chart_family: family,
        chart,
    }))
}

pub async fn table_page(payload: web::Json<TableRequest>) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let engine = table_engine(rowset_from_json(&req.results)?, &req.filter, req.sort);

    let indices = engine.view_indices();
    let paging = engine.page(req.page, req.page_size);
    let page = engine.rows().select_rows(&indices[paging.start..paging.end]);

    Ok(HttpResponse::Ok().json(TableResponse {
        columns: page.columns.clone(),
        rows: rowset_to_json(&page),
        paging,
    }))
}

pub async fn export_table(
    state: web::Data<ApiState>,
    payload: web::Json<ExportRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let engine = table_engine(rowset_from_json(&req.results)?, &req.filter, req.sort);
    let delimiter = req.delimiter.unwrap_or(state.delimiter);

    let body = engine.export(req.scope, delimiter)?;

    let mut response = HttpResponse::Ok();
    response.content_type("text/csv; charset=utf-8");
    if let Some(name) = req.report_name.as_deref().filter(|name| !name.is_empty()) {
        let file_name = export_file_name(name, chrono::Local::now().date_naive());
        response.insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ));
    }

    Ok(response.body(body))
}

fn table_engine(rows: RowSet, filter: &str, sort: SortState) -> TableEngine {
    let mut engine = TableEngine::new(rows);
    engine.set_filter(filter);
    engine.set_sort(sort);
    engine
}
